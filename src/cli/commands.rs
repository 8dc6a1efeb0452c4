use crate::events::UiEvent;
use crate::grid::FilterOp;
use crate::layout::Orientation;
use crate::model::RecordId;

/// One line typed at the interactive prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Events(Vec<UiEvent>),
    /// Select the n-th visible row (1-based).
    Row(usize),
    /// Narrowing updates keep whichever half they do not name.
    Status(Option<i64>),
    Authority(Option<String>),
    Show,
    Save(String),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Feed:      more | page N | status N|- | authority NAME|-
Rows:      select ID | row N | show
Filter:    filter TEXT (id like TEXT) | filter FIELD OP VALUE | unfilter
           OP is one of = != like starts ends regex
Columns:   check FIELD | uncheck FIELD | apply | columns F1,F2,...
Report:    report | issue TEXT | confirm | close | dismiss
Other:     types | panes h|v | save FILE | help | logout";

fn one_event(event: UiEvent) -> Input {
    Input::Events(vec![event])
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value)
    }
}

fn optional_arg(value: &str) -> Option<String> {
    match value {
        "" | "-" => None,
        other => Some(other.to_string()),
    }
}

pub fn parse(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_lowercase().as_str() {
        "" => Ok(Input::Empty),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "logout" | "q" => Ok(Input::Quit),
        "show" | "ls" => Ok(Input::Show),
        "more" | "next" => Ok(one_event(UiEvent::NextPage)),
        "page" => {
            let raw = required(rest, "page N")?;
            let page = raw
                .parse::<u64>()
                .map_err(|_| format!("invalid page '{raw}'"))?;
            Ok(one_event(UiEvent::PageRequested { page }))
        }
        "select" => {
            let raw = required(rest, "select ID")?;
            Ok(one_event(UiEvent::RowSelected {
                id: RecordId::new(raw),
            }))
        }
        "row" => {
            let raw = required(rest, "row N")?;
            let n = raw
                .parse::<usize>()
                .map_err(|_| format!("invalid row '{raw}'"))?;
            Ok(Input::Row(n))
        }
        "filter" => parse_filter(rest),
        "unfilter" => Ok(one_event(UiEvent::FilterCleared)),
        "check" | "uncheck" => {
            let field = required(rest, "check FIELD")?;
            Ok(one_event(UiEvent::ToggleChanged {
                field: field.to_string(),
                checked: word.eq_ignore_ascii_case("check"),
            }))
        }
        "apply" => Ok(one_event(UiEvent::TogglesApplied)),
        "columns" => {
            let wanted: Vec<&str> = rest
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            crate::columns::ColumnToggles::from_names(wanted.iter()).map_err(|e| e.to_string())?;
            let mut events: Vec<UiEvent> = crate::columns::CATALOG
                .iter()
                .map(|col| UiEvent::ToggleChanged {
                    field: col.field.to_string(),
                    checked: false,
                })
                .collect();
            events.extend(wanted.iter().map(|field| UiEvent::ToggleChanged {
                field: field.to_string(),
                checked: true,
            }));
            events.push(UiEvent::TogglesApplied);
            Ok(Input::Events(events))
        }
        "status" => {
            let status = match optional_arg(rest) {
                Some(raw) => Some(
                    raw.parse::<i64>()
                        .map_err(|_| format!("invalid status '{raw}'"))?,
                ),
                None => None,
            };
            Ok(Input::Status(status))
        }
        "authority" => Ok(Input::Authority(optional_arg(rest))),
        "types" => Ok(one_event(UiEvent::TypesRequested)),
        "report" => Ok(one_event(UiEvent::ReportOpened)),
        "issue" => Ok(one_event(UiEvent::IssueSubmitted {
            body: rest.to_string(),
        })),
        "confirm" => Ok(one_event(UiEvent::FeedbackConfirmed)),
        "close" => Ok(one_event(UiEvent::ReportClosed)),
        "dismiss" => Ok(one_event(UiEvent::NoticeDismissed)),
        "panes" => {
            let raw = required(rest, "panes h|v")?;
            let direction = Orientation::parse(raw).map_err(|e| e.to_string())?;
            Ok(one_event(UiEvent::PanesChanged(direction)))
        }
        "save" => Ok(Input::Save(required(rest, "save FILE")?.to_string())),
        other => Err(format!("unknown command '{other}', type `help`")),
    }
}

fn parse_filter(rest: &str) -> Result<Input, String> {
    let rest = required(rest, "filter TEXT | filter FIELD OP VALUE")?;
    let parts: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
    if parts.len() == 3 {
        if let Some(op) = FilterOp::parse(parts[1]) {
            return Ok(one_event(UiEvent::FilterApplied {
                field: parts[0].to_string(),
                op,
                value: parts[2].trim().to_string(),
            }));
        }
    }
    Ok(one_event(UiEvent::FilterApplied {
        field: "id".to_string(),
        op: FilterOp::Like,
        value: rest.to_string(),
    }))
}
