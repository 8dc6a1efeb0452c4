use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "thingview",
    version,
    about = "terminal browser for paginated thing records",
    long_about = "thingview pages through the records of a remote thing API, shows a record's raw JSON and lets you flag broken records.\n\nExamples:\n  thingview\n  thingview -u https://mars.cyverse.org --page 3 -l 200\n  thingview --show ark:/21547/abc123\n  thingview --types\n\nWithout --page, --show or --types an interactive session starts; type `help` there for commands."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Source",
        help = "Base URL of the thing API."
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "tp",
        visible_alias = "thing-path",
        value_name = "SEGMENT",
        help_heading = "Source",
        help = "Path segment of the thing endpoints (default: thing)."
    )]
    pub thing_path: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Source",
        help = "Path to config file (defaults to ~/.thingview/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Source",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "Source",
        help = "HTTP proxy for every request."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'l',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Feed",
        help = "Records per page (default: 1000)."
    )]
    pub page_size: Option<u32>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "status",
        value_name = "CODE",
        help_heading = "Feed",
        help = "Only list records whose resolve status matches."
    )]
    pub status: Option<i64>,

    #[arg(
        short = 'a',
        long = "au",
        visible_alias = "authority",
        value_name = "NAME",
        help_heading = "Feed",
        help = "Only list records from this authority."
    )]
    pub authority: Option<String>,

    #[arg(
        short = 'f',
        long = "cols",
        visible_alias = "columns",
        value_name = "FIELDS",
        help_heading = "Table",
        help = "Comma-separated columns to show (id,authority_id,tcreated,resolved_status,resolved_url,resolve_elapsed)."
    )]
    pub columns: Option<String>,

    #[arg(
        long = "dp",
        visible_alias = "detail-policy",
        value_name = "POLICY",
        help_heading = "Table",
        help = "Which racing record fetch wins the detail pane (last-resolved or last-requested)."
    )]
    pub detail_policy: Option<String>,

    #[arg(
        short = 'o',
        long = "or",
        visible_alias = "orientation",
        value_name = "DIR",
        help_heading = "Table",
        help = "Detail panes side by side (h) or stacked (v)."
    )]
    pub orientation: Option<String>,

    #[arg(
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "One-shot",
        help = "Print one page of records and exit."
    )]
    pub page: Option<u64>,

    #[arg(
        long = "sh",
        visible_alias = "show",
        value_name = "ID",
        help_heading = "One-shot",
        help = "Print one record's raw JSON and exit."
    )]
    pub show: Option<String>,

    #[arg(
        short = 't',
        long = "ty",
        visible_alias = "types",
        help_heading = "One-shot",
        help = "Print record type counts and exit."
    )]
    pub types: bool,

    #[arg(
        short = 'e',
        long = "ex",
        visible_alias = "export",
        value_name = "FILE",
        help_heading = "One-shot",
        help = "With --page: write the page to FILE instead of the terminal."
    )]
    pub export: Option<String>,

    #[arg(
        long = "ef",
        visible_alias = "export-format",
        value_name = "FORMAT",
        help_heading = "One-shot",
        help = "Export format (text or json); inferred from the file extension by default."
    )]
    pub export_format: Option<String>,
}
