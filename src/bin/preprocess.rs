/**
 * SeqPrep
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::env;
use std::error::Error;
use std::process;

use getopts::{Matches, Options};
use tracing_subscriber::EnvFilter;

use seqprep::config::PreprocessConfig;
use seqprep::datasets::DATASET_CODES;
use seqprep::pipeline::{self, Outcome};
use seqprep::progress::{Bar, Progress, Silent};

fn main() {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("d", "dataset", &format!("Dataset to prepare (required), one of: {}.",
        DATASET_CODES.join(", ")), "CODE");
    opts.optopt("r", "data-root", "Folder holding the raw data in <root>/<code>/ and the \
        prepared datasets in <root>/preprocessed/ (optional, defaults to 'data').", "PATH");
    opts.optopt("", "min-uc", "Minimum number of interactions per user (optional, defaults \
        to 5).", "NUMBER");
    opts.optopt("", "min-sc", "Minimum number of interactions per item (optional, defaults \
        to 5).", "NUMBER");
    opts.optopt("", "min-rating", "Drop ratings below this value before filtering (optional, \
        defaults to 0 which keeps everything).", "NUMBER");
    opts.optopt("", "year", "Only keep interactions from this calendar year in UTC (optional, \
        yelp2020 defaults to 2019).", "YEAR");
    opts.optopt("", "max-malformed", "Fraction of unparseable raw records to tolerate \
        (optional, defaults to 0.01).", "FRACTION");
    opts.optflag("q", "quiet", "Do not show progress bars");
    opts.optflag("h", "help", "Print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            let hint = failure.to_string();
            return print_usage_and_exit(&program, opts, Some(&hint))
        },
    };

    if matches.opt_present("h") {
        return print_usage(&program, &opts, None);
    }

    if !matches.opt_present("d") {
        return print_usage_and_exit(
            &program,
            opts,
            Some("Please specify a dataset via --dataset."),
        );
    }

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(hint) => return print_usage_and_exit(&program, opts, Some(&hint)),
    };

    let progress: Box<dyn Progress> = if matches.opt_present("q") {
        Box::new(Silent)
    } else {
        Box::new(Bar::new())
    };

    if let Err(failure) = run(&config, progress.as_ref()) {
        eprintln!("\nFailed to prepare {}: {}\n", config.dataset_code, failure);
        process::exit(1);
    }
}

fn config_from(matches: &Matches) -> Result<PreprocessConfig, String> {

    let dataset_code = matches.opt_str("d").unwrap_or_default();

    let mut config = PreprocessConfig::new(dataset_code)
        .min_uc(option_or(matches, "min-uc", 5)?)
        .min_sc(option_or(matches, "min-sc", 5)?)
        .min_rating(option_or(matches, "min-rating", 0.0)?)
        .max_malformed_fraction(option_or(matches, "max-malformed", 0.01)?);

    if let Some(data_root) = matches.opt_str("r") {
        config = config.data_root(data_root);
    }

    let year: Option<i32> = matches.opt_get("year")
        .map_err(|failure| format!("Problem with option 'year': {}", failure))?;

    Ok(config.year(year))
}

fn option_or<T>(matches: &Matches, name: &str, default: T) -> Result<T, String>
    where T: std::str::FromStr, T::Err: std::fmt::Display {

    matches.opt_get_default(name, default)
        .map_err(|failure| format!("Problem with option '{}': {}", name, failure))
}

fn run(config: &PreprocessConfig, progress: &dyn Progress) -> Result<(), Box<dyn Error>> {

    match pipeline::preprocess(config, progress)? {
        Outcome::Skipped(path) => {
            println!("Already preprocessed, nothing to do: {}", path.display());
        }
        Outcome::Written { path, summary } => {
            println!(
                "Wrote {} interactions between {} users and {} items ({:.4}% dense) to {}",
                summary.total_interactions(),
                summary.num_users,
                summary.num_items,
                summary.density(),
                path.display(),
            );
        }
    }

    Ok(())
}

fn print_usage(program: &str, opts: &Options, hint: Option<&str>) {

    if let Some(hint) = hint {
        eprintln!("\n{}\n", hint);
    }

    let brief = format!("Usage: {} --dataset CODE [options]", program);
    eprint!("{}", opts.usage(&brief));
}

fn print_usage_and_exit(program: &str, opts: Options, hint: Option<&str>) {
    print_usage(program, &opts, hint);
    process::exit(2);
}
