/// Command line parsing and the top-level run sequence
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crate::caffeine::Caffeine;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::duration::{self, BareUnit};
use crate::error::{CountdownError, Result};
use crate::hooks::execute_hook;
use crate::screen::TerminalScreen;
use crate::timer::Countdown;

const DEFAULT_REFRESH_SECS: i64 = 1;

/// A simple countdown timer
#[derive(Parser, Debug)]
#[command(name = "countdown", version, about)]
pub struct Args {
    /// Duration to count down (e.g. 1d2h30m15s, 90m, 30); plain numbers use --unit
    #[arg(value_name = "TIME", default_value = "10s")]
    pub time: String,

    /// Unit of a plain-number TIME: hours (h), minutes (m) or seconds (s).
    /// Cannot be used with time strings like 1h30m
    #[arg(long, value_enum, ignore_case = true)]
    pub unit: Option<BareUnit>,

    /// How often to refresh the timer, in seconds [default: 1]
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub refresh: Option<i64>,

    /// Prevent the system from sleeping while the timer runs
    #[arg(long)]
    pub caffeinate: bool,

    /// Text to display along with the timer
    #[arg(long, value_name = "STRING")]
    pub text: Option<String>,

    /// Path to a file whose contents are displayed along with the timer
    #[arg(long, value_name = "PATH")]
    pub textfile: Option<PathBuf>,

    /// Config file to use instead of ~/.config/countdown/config.json
    #[arg(long, value_name = "PATH", env = "COUNTDOWN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Refresh interval from the flag, then the config file, then the default.
    pub fn refresh_interval(&self, config: &Config) -> Result<Duration> {
        let secs = match (self.refresh, config.refresh) {
            (Some(flag), _) => flag,
            (None, Some(configured)) => i64::try_from(configured).unwrap_or(i64::MAX),
            (None, None) => DEFAULT_REFRESH_SECS,
        };
        if secs <= 0 {
            return Err(CountdownError::InvalidArgument(format!(
                "refresh interval must be greater than zero, got {}",
                secs
            )));
        }
        Ok(Duration::from_secs(secs.unsigned_abs()))
    }

    pub fn duration(&self) -> Result<Duration> {
        duration::resolve(&self.time, self.unit)
    }

    /// Literal `--text` wins over `--textfile`.
    pub fn display_text(&self) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        match &self.textfile {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read text file {}", path.display())),
            None => Ok(String::new()),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let refresh = args.refresh_interval(&config)?;
    let duration = args.duration()?;
    let mut text = args.display_text()?;
    log::debug!(
        "duration={}s refresh={}s text={} bytes",
        duration.as_secs(),
        refresh.as_secs(),
        text.len()
    );

    let mut caffeine = None;
    if args.caffeinate || config.caffeinate {
        let mut detected = Caffeine::detect();
        detected.begin();
        if let Caffeine::Unavailable { reason } = &detected {
            log::warn!("Sleep prevention unavailable: {}", reason);
        }
        text = detected.annotate(&text);
        caffeine = Some(detected);
    }

    let countdown = Countdown {
        duration,
        refresh,
        text,
    };

    log::info!("Starting {} second countdown", duration.as_secs());
    execute_hook("start", config.hooks.start.as_deref());
    let state = countdown.run(&mut SystemClock, &mut TerminalScreen::stdout())?;
    log::info!("Countdown finished ({:?})", state);
    execute_hook("complete", config.hooks.complete.as_deref());

    if let Some(mut caffeine) = caffeine {
        caffeine.end();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("countdown").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.time, "10s");
        assert_eq!(args.duration().unwrap(), Duration::from_secs(10));
        assert_eq!(
            args.refresh_interval(&Config::default()).unwrap(),
            Duration::from_secs(1)
        );
        assert_eq!(args.display_text().unwrap(), "");
    }

    #[test]
    fn test_unit_is_case_insensitive() {
        let args = args(&["90", "--unit", "M"]);
        assert_eq!(args.unit, Some(BareUnit::Minutes));
        assert_eq!(args.duration().unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_unknown_unit_is_rejected_by_parser() {
        assert!(Args::try_parse_from(["countdown", "5", "--unit", "d"]).is_err());
    }

    #[test]
    fn test_unit_with_compound_expression_conflicts() {
        let args = args(&["1h30m", "--unit", "m"]);
        assert!(matches!(
            args.duration(),
            Err(CountdownError::ConflictingUnitSpecification { .. })
        ));
    }

    #[test]
    fn test_refresh_must_be_positive() {
        for value in ["0", "-3"] {
            let args = args(&["--refresh", value]);
            assert!(matches!(
                args.refresh_interval(&Config::default()),
                Err(CountdownError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_refresh_precedence() {
        let config = Config {
            refresh: Some(5),
            ..Config::default()
        };
        assert_eq!(
            args(&[]).refresh_interval(&config).unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            args(&["--refresh", "2"]).refresh_interval(&config).unwrap(),
            Duration::from_secs(2)
        );

        let zero = Config {
            refresh: Some(0),
            ..Config::default()
        };
        assert!(args(&[]).refresh_interval(&zero).is_err());
    }

    #[test]
    fn test_text_takes_precedence_over_textfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();
        let path = file.path().to_str().unwrap();

        assert_eq!(
            args(&["--textfile", path]).display_text().unwrap(),
            "from file"
        );
        assert_eq!(
            args(&["--text", "literal", "--textfile", path])
                .display_text()
                .unwrap(),
            "literal"
        );
    }

    #[test]
    fn test_missing_textfile_names_path() {
        let err = args(&["--textfile", "/nonexistent/countdown.txt"])
            .display_text()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/countdown.txt"));
    }
}
