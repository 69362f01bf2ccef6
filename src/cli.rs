use crate::{filter::FilterOptions, parse::DEFAULT_SOURCE, views::View};
use anyhow::{bail, Context, Error};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use std::{fmt, path::PathBuf, str::FromStr};

/// Grassroots, for finding local community and climate actions to take part in.
#[derive(Parser, Debug)]
pub struct Cli {
    #[command(flatten)]
    view_options: ViewOptions,

    /// The URL of the CSV inventory of actions.
    #[arg(long, env = "GRASSROOTS_CSV_URL", default_value = DEFAULT_SOURCE)]
    pub source: String,
    /// The date to treat as today (`YYYY-MM-DD`). Actions dated before this won't be shown.
    /// Defaults to the current local date.
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Which encoding to output.
    #[arg(short, long, default_value = "json")]
    pub encoding: Encoding,

    /// The time categories views can filter by.
    #[arg(long, env = "GRASSROOTS_TIME_OPTIONS", value_delimiter = ',', default_values_t = FilterOptions::default().time)]
    time_options: Vec<String>,
    /// The effort categories views can filter by.
    #[arg(long, env = "GRASSROOTS_EFFORT_OPTIONS", value_delimiter = ',', default_values_t = FilterOptions::default().effort)]
    effort_options: Vec<String>,
    /// The interests views can filter by.
    #[arg(long, env = "GRASSROOTS_INTEREST_OPTIONS", value_delimiter = ',', default_values_t = FilterOptions::default().interests)]
    interest_options: Vec<String>,
}
impl Cli {
    /// The option sets the criteria in views are validated against.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            time: self.time_options.clone(),
            effort: self.effort_options.clone(),
            interests: self.interest_options.clone(),
        }
    }

    /// Extracts the views from the options, which may involve reading a JSON definition of them.
    /// If the user has requested help on the views, this will return `Ok(None)`, and the caller
    /// should exit the process (help is printed automatically). Every view is validated against
    /// the filter options, and view names must be unique.
    pub fn parse_views(&mut self) -> Result<Option<Vec<NamedView>>, Error> {
        let views = if let Some(views_help) = &self.view_options.views_help {
            NamedView::try_parse_from(
                std::iter::once("grassroots_view").chain(
                    views_help
                        .iter()
                        .map(String::as_str)
                        .chain(std::iter::once("--help")),
                ),
            )?;
            return Ok(None);
        } else if !self.view_options.views.is_empty() {
            std::mem::take(&mut self.view_options.views)
        } else if let Some(json_path) = &self.view_options.views_json {
            let json_contents = std::fs::read_to_string(json_path)
                .with_context(|| "failed to read json views file")?;
            let JsonViews(views) = serde_json::from_str(&json_contents)
                .with_context(|| "failed to parse json views file")?;
            views
        } else {
            // We're guaranteed to have one of them set by `clap`'s parsing rules
            unreachable!()
        };

        let options = self.filter_options();
        for (idx, named_view) in views.iter().enumerate() {
            if views[..idx].iter().any(|v| v.name == named_view.name) {
                bail!("view `{}` is defined more than once", named_view.name);
            }
            named_view
                .view
                .validate(&options)
                .with_context(|| format!("failed to validate view `{}`", named_view.name))?;
        }

        Ok(Some(views))
    }
}

/// Options that allow the user to pass views directly, with a JSON file (for more complex
/// configurations), or to get help around how to specify views.
#[derive(Parser, Debug)]
#[group(multiple = false, required = true)]
struct ViewOptions {
    /// Every one of these will create a new view (e.g. `--view "weekend actions -t Days"`).
    /// Within each argument, a separate CLI parse occurs, see help by running `grassroots
    /// --help-views`
    #[arg(short, long = "view", num_args=1.., value_parser)]
    views: Vec<NamedView>,

    /// The path to a JSON file declaring the views to use as a map of view names to view options
    #[arg(short = 'j', long = "views-json")]
    views_json: Option<PathBuf>,

    /// Produces a help message about how to to specify views on the CLI (you can add a particular
    /// subcommand after this to get more detailed info)
    #[arg(long = "help-views", trailing_var_arg = true, num_args = 0..)]
    views_help: Option<Vec<String>>,
}

/// The encoding to use for the output of the CLI.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "snake_case")]
pub enum Encoding {
    /// JSON, the default encoding.
    Json,
    /// Bincode, which is *much* faster to handle if passing output to another Rust program.
    Bincode,
}

/// A view with a name, which will be parsed from what is effectively a sub-CLI inside the
/// `-v/--view` argument.
#[derive(Parser, Clone, Debug)]
pub struct NamedView {
    /// The name of the view to produce, which will be the key in the final output map.
    pub name: String,

    #[clap(subcommand)]
    pub view: View,
}
impl FromStr for NamedView {
    type Err = clap::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // We split the user's input as a shell would (respecting quotes, that's the only thing
        // that can cause an error here), and then we parse it directly
        let parts = shellwords::split(s).map_err(|_| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                "mismatched quotes in view arguments",
            )
        })?;
        let fake_argv = std::iter::once("grassroots_view").chain(parts.iter().map(|s| s.as_str()));
        NamedView::try_parse_from(fake_argv)
    }
}

/// The views declared in a JSON file: an object mapping view names to view options. Views keep the
/// order they're declared in, and a name declared twice is an error rather than the last one
/// silently winning.
struct JsonViews(Vec<NamedView>);
impl<'de> Deserialize<'de> for JsonViews {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct JsonViewsVisitor;
        impl<'de> Visitor<'de> for JsonViewsVisitor {
            type Value = JsonViews;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of view names to view options")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut views: Vec<NamedView> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(name) = map.next_key::<String>()? {
                    if views.iter().any(|v| v.name == name) {
                        return Err(serde::de::Error::custom(format!(
                            "view `{name}` is defined more than once"
                        )));
                    }
                    let view = map.next_value::<View>()?;
                    views.push(NamedView { name, view });
                }
                Ok(JsonViews(views))
            }
        }

        deserializer.deserialize_map(JsonViewsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ActionsFilter;

    #[test]
    fn test_named_view_from_str() {
        let named: NamedView = "\"weekend plans\" actions -t Days -i Food -i \"Urban Planning\""
            .parse()
            .unwrap();
        assert_eq!(named.name, "weekend plans");
        let View::Actions(filter) = named.view else {
            panic!("wrong view");
        };
        assert_eq!(
            filter,
            ActionsFilter {
                time: "Days".to_string(),
                effort: "Any".to_string(),
                interests: vec!["Food".to_string(), "Urban Planning".to_string()],
            }
        );
    }

    #[test]
    fn test_named_view_errors() {
        assert!("broken actions -t \"Days".parse::<NamedView>().is_err());
        assert!("nameless".parse::<NamedView>().is_err());
        assert!("x invite -t Title".parse::<NamedView>().is_err());
    }

    #[test]
    fn test_cli_views() {
        let mut cli = Cli::try_parse_from([
            "grassroots",
            "--today",
            "2025-06-15",
            "-v",
            "all actions",
            "-v",
            "mornings slots -e Individual",
        ])
        .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 6, 15));
        assert_eq!(cli.encoding, Encoding::Json);
        assert_eq!(cli.filter_options(), FilterOptions::default());
        let views = cli.parse_views().unwrap().unwrap();
        assert_eq!(
            views.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["all", "mornings"]
        );
    }

    #[test]
    fn test_cli_rejects_bad_views() {
        let mut unknown = Cli::try_parse_from(["grassroots", "-v", "x actions -t Years"]).unwrap();
        assert!(unknown.parse_views().is_err());

        let mut duplicate =
            Cli::try_parse_from(["grassroots", "-v", "x actions", "-v", "x slots"]).unwrap();
        assert!(duplicate.parse_views().is_err());

        // Custom option sets change what's valid
        let mut custom = Cli::try_parse_from([
            "grassroots",
            "--time-options",
            "Any,Years",
            "-v",
            "x actions -t Years",
        ])
        .unwrap();
        assert!(custom.parse_views().is_ok());
    }

    #[test]
    fn test_json_views() {
        let JsonViews(views) = serde_json::from_str(
            r#"{
                "weekend": { "type": "actions", "time": "Days" },
                "all": { "type": "slots" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            views.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["weekend", "all"]
        );
        assert!(matches!(views[1].view, View::Slots(_)));

        let err = serde_json::from_str::<JsonViews>(
            r#"{ "x": { "type": "actions" }, "x": { "type": "slots" } }"#,
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("view `x` is defined more than once"));

        assert!(serde_json::from_str::<JsonViews>(r#"[{ "type": "actions" }]"#).is_err());
    }

    #[test]
    fn test_cli_views_json_file() {
        let dir = std::env::temp_dir().join(format!("grassroots-views-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "b": { "type": "actions" }, "a": { "type": "slots" } }"#)
            .unwrap();
        let duplicate = dir.join("duplicate.json");
        std::fs::write(
            &duplicate,
            r#"{ "a": { "type": "actions" }, "a": { "type": "actions", "time": "Days" } }"#,
        )
        .unwrap();

        let mut cli = Cli::try_parse_from(["grassroots", "-j", good.to_str().unwrap()]).unwrap();
        let views = cli.parse_views().unwrap().unwrap();
        assert_eq!(
            views.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );

        let mut cli =
            Cli::try_parse_from(["grassroots", "-j", duplicate.to_str().unwrap()]).unwrap();
        assert!(cli.parse_views().is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cli_requires_views() {
        assert!(Cli::try_parse_from(["grassroots"]).is_err());
        assert!(Cli::try_parse_from(["grassroots", "-v", "x actions", "-j", "views.json"]).is_err());
    }
}
