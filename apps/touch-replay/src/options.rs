use clap::{Parser, ValueEnum};

/// Gesture to replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    Tap,
    DoubleTap,
    LongPress,
    Swipe,
    Pinch,
}

/// How the simulated page treats touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PageBehavior {
    /// No touch handlers; nothing is offered.
    #[value(name = "none")]
    NoHandlers,
    /// Handlers that let every sample through.
    Ignores,
    /// Handlers that consume every sample.
    Consumes,
    /// Handlers that never answer.
    Silent,
}

#[derive(Clone, Debug, PartialEq, Parser)]
#[command(name = "touch-replay")]
#[command(about = "Replays a scripted gesture through the touch arbiter")]
pub struct Options {
    #[arg(long, value_enum, default_value_t = Scenario::Swipe)]
    pub scenario: Scenario,
    #[arg(long, value_enum, default_value_t = PageBehavior::Ignores)]
    pub page: PageBehavior,
    /// Delay before the page answers an offered touch.
    #[arg(long = "latency", default_value_t = 30)]
    pub latency_ms: u64,
    /// Screen density used to scale slop and fling thresholds.
    #[arg(long, default_value_t = 1.0, value_parser = parse_density)]
    pub density: f32,
}

fn parse_density(value: &str) -> Result<f32, String> {
    match value.parse::<f32>() {
        Ok(density) if density > 0.0 && density.is_finite() => Ok(density),
        Ok(_) => Err(format!("density must be positive, got {value}")),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("touch-replay").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse(&[]).expect("no flags");
        assert_eq!(options.scenario, Scenario::Swipe);
        assert_eq!(options.page, PageBehavior::Ignores);
        assert_eq!(options.latency_ms, 30);
        assert_eq!(options.density, 1.0);
    }

    #[test]
    fn flags_override_defaults() {
        let options = parse(&[
            "--scenario",
            "double-tap",
            "--page",
            "none",
            "--latency",
            "5",
        ])
        .expect("valid flags");
        assert_eq!(options.scenario, Scenario::DoubleTap);
        assert_eq!(options.page, PageBehavior::NoHandlers);
        assert_eq!(options.latency_ms, 5);
    }

    #[test]
    fn bad_input_is_reported() {
        let err = parse(&["--density", "0"]).expect_err("zero density");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        let err = parse(&["--fast"]).expect_err("unknown flag");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        let err = parse(&["--help"]).expect_err("help short-circuits");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }
}
