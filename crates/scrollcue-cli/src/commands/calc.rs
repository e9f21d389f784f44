use anyhow::Result;
use clap::Args;

use scrollcue_core::scroll::{calculate, CalcInput};
use scrollcue_core::{AppConfig, ScrollConfig, ScrollMethod};

#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Rendered text height in pixels
    #[arg(long)]
    pub text_height: f64,
    /// Visible container height in pixels
    #[arg(long)]
    pub container_height: Option<f64>,
    /// Scroll speed, clamped to 1..=100
    #[arg(long)]
    pub speed: Option<i32>,
    /// classic, wpm, duration or lines
    #[arg(long)]
    pub method: Option<ScrollMethod>,
    /// Word count for the wpm method
    #[arg(long)]
    pub words: Option<u32>,
    /// Resume from this position instead of the top
    #[arg(long, allow_hyphen_values = true)]
    pub paused_position: Option<f64>,
}

pub fn run(config: &AppConfig, args: &CalcArgs) -> Result<()> {
    let (input, scroll_config) = build(config, args);
    let result = calculate(&input, &scroll_config);
    println!("{}", result.to_json()?);
    Ok(())
}

fn build(config: &AppConfig, args: &CalcArgs) -> (CalcInput, ScrollConfig) {
    let mut scroll_config = config.scroll.clone();
    if let Some(method) = args.method {
        scroll_config.method = method;
    }

    let input = CalcInput {
        text_height: args.text_height,
        container_height: args
            .container_height
            .unwrap_or(config.container.default_height),
        speed: args.speed.unwrap_or(scroll_config.speed),
        paused_position: args.paused_position,
        word_count: args.words,
    };
    (input, scroll_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct CalcCli {
        #[command(flatten)]
        args: CalcArgs,
    }

    fn args(text_height: f64) -> CalcArgs {
        CalcArgs {
            text_height,
            container_height: None,
            speed: None,
            method: None,
            words: None,
            paused_position: None,
        }
    }

    #[test]
    fn test_method_flag_parses_labels() {
        let cli = CalcCli::try_parse_from(["calc", "--text-height", "800", "--method", "Wpm"])
            .unwrap();
        assert_eq!(cli.args.method, Some(ScrollMethod::Wpm));
        assert!(
            CalcCli::try_parse_from(["calc", "--text-height", "800", "--method", "fast"]).is_err()
        );
    }

    #[test]
    fn test_build_uses_config_defaults() {
        let config = AppConfig::default();
        let (input, scroll_config) = build(&config, &args(1000.0));
        assert_eq!(input.container_height, 300.0);
        assert_eq!(input.speed, 16);
        assert_eq!(scroll_config.method, ScrollMethod::Classic);
    }

    #[test]
    fn test_build_overrides() {
        let config = AppConfig::default();
        let mut a = args(1000.0);
        a.method = Some(ScrollMethod::Duration);
        a.speed = Some(150);
        a.paused_position = Some(-500.0);

        let (input, scroll_config) = build(&config, &a);
        let result = calculate(&input, &scroll_config);
        assert_eq!(scroll_config.method, ScrollMethod::Duration);
        assert_eq!(result.duration, 180_000.0);
        assert_eq!(result.end_position, -1400.0);
    }
}
