
use serde_json::json;

use crate::columns::{self, ColumnToggles};
use crate::detail::{Applied, DetailLoader, DetailPolicy, DetailView};
use crate::events::{Command, Completion, UiEvent};
use crate::feed::{self, FeedAdapter, FeedError, Narrowing};
use crate::grid::{DataGrid, FilterOp, TableGrid};
use crate::layout::{DashboardLayout, Orientation, SplitConfig, SplitPane};
use crate::model::{PageRequest, PageResponse, Record, RecordId};
use crate::session::{Session, SessionError, SessionOptions};
use crate::source::FetchError;

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

fn page_of(ids: &[&str], total: u64) -> PageResponse {
    PageResponse {
        data: ids
            .iter()
            .map(|id| {
                record(json!({
                    "id": id,
                    "authority_id": "SESAR",
                    "tcreated": "2021-03-04T05:06:07",
                    "resolved_status": 200,
                    "resolved_url": format!("https://example.org/{id}"),
                    "resolve_elapsed": 0.25,
                }))
            })
            .collect(),
        total_records: total,
        last_page: None,
        params: None,
    }
}

fn fetch_page(commands: Vec<Command>) -> PageRequest {
    match commands.as_slice() {
        [Command::FetchPage(request)] => request.clone(),
        other => panic!("expected one page fetch, got {other:?}"),
    }
}

fn fetch_detail(commands: Vec<Command>) -> crate::detail::DetailTicket {
    match commands.as_slice() {
        [Command::FetchDetail(ticket)] => ticket.clone(),
        other => panic!("expected one detail fetch, got {other:?}"),
    }
}

fn loaded_session(options: SessionOptions, ids: &[&str]) -> Session {
    let mut session = Session::new(options).unwrap();
    let request = fetch_page(session.start().unwrap());
    session.complete(Completion::Page {
        request,
        result: Ok(page_of(ids, ids.len() as u64)),
    });
    session
}

fn select(session: &mut Session, id: &str) -> crate::detail::DetailTicket {
    fetch_detail(
        session
            .handle(UiEvent::RowSelected {
                id: RecordId::new(id),
            })
            .unwrap(),
    )
}

#[test]
fn page_numbers_translate_to_offsets() {
    assert_eq!(feed::page_request(1, 1000).unwrap().offset, 0);
    assert_eq!(feed::page_request(3, 1000).unwrap().offset, 2000);
    assert_eq!(feed::page_request(7, 25).unwrap().offset, 150);
    for page in 1..=20u64 {
        for limit in [1u32, 10, 999] {
            let req = feed::page_request(page, limit).unwrap();
            assert_eq!(req.offset, (page - 1) * u64::from(limit));
            assert_eq!(req.limit, limit);
        }
    }
}

#[test]
fn page_request_rejects_zero_page_and_limit() {
    assert_eq!(
        feed::page_request(0, 10),
        Err(FeedError::InvalidPage { page: 0 })
    );
    assert_eq!(
        feed::page_request(1, 0),
        Err(FeedError::InvalidLimit { limit: 0 })
    );
}

#[test]
fn loaded_counter_accumulates_and_total_is_replaced() {
    let mut adapter = FeedAdapter::new(3, Narrowing::default()).unwrap();

    adapter.request_page(1).unwrap();
    let first = page_of(&["a", "b", "c"], 10);
    let passed = adapter.on_response(first.clone());
    assert_eq!(passed, first);

    adapter.request_page(2).unwrap();
    adapter.on_response(page_of(&["d", "e"], 7));

    assert_eq!(adapter.loaded(), 5);
    assert_eq!(adapter.total(), 7);
}

#[test]
fn one_page_fetch_at_a_time() {
    let mut adapter = FeedAdapter::new(10, Narrowing::default()).unwrap();
    adapter.request_page(1).unwrap();
    assert!(matches!(
        adapter.request_page(2),
        Err(FeedError::Busy { page: 2, .. })
    ));
    adapter.on_failure("boom");
    assert!(!adapter.is_pending());
    assert_eq!(adapter.loaded(), 0);
    assert_eq!(adapter.last_error(), Some("boom"));
    assert!(adapter.request_page(2).is_ok());
}

#[test]
fn next_page_stops_at_the_end_of_the_feed() {
    let mut adapter = FeedAdapter::new(2, Narrowing::default()).unwrap();
    assert_eq!(adapter.next_page(), Some(1));

    adapter.request_next().unwrap();
    adapter.on_response(page_of(&["a", "b"], 3));
    assert_eq!(adapter.next_page(), Some(2));

    let req = adapter.request_next().unwrap();
    assert_eq!(req.offset, 2);
    adapter.on_response(page_of(&["c"], 3));
    assert_eq!(adapter.next_page(), None);
    assert_eq!(adapter.request_next(), Err(FeedError::Exhausted));
}

#[test]
fn server_last_page_ends_the_feed() {
    let mut adapter = FeedAdapter::new(2, Narrowing::default()).unwrap();
    adapter.request_page(1).unwrap();
    let mut response = page_of(&["a", "b"], 100);
    response.last_page = Some(1);
    adapter.on_response(response);
    assert_eq!(adapter.next_page(), None);
}

#[test]
fn narrowing_is_sent_with_every_page() {
    let narrowing = Narrowing {
        status: Some(404),
        authority: Some("GEOME".to_string()),
    };
    let mut adapter = FeedAdapter::new(50, narrowing).unwrap();
    let req = adapter.request_page(2).unwrap();
    assert_eq!(req.offset, 50);
    assert_eq!(req.status, Some(404));
    assert_eq!(req.authority.as_deref(), Some("GEOME"));
}

#[test]
fn projection_follows_catalog_order_not_check_order() {
    let mut toggles = ColumnToggles::none();
    toggles.set("tcreated", true).unwrap();
    toggles.set("id", true).unwrap();
    let fields: Vec<_> = columns::project(&toggles)
        .iter()
        .map(|c| c.field)
        .collect();
    assert_eq!(fields, vec!["id", "tcreated"]);

    let from_names = ColumnToggles::from_names(["tcreated", "id"]).unwrap();
    assert_eq!(from_names, toggles);
}

#[test]
fn projection_with_nothing_checked_is_empty() {
    assert!(columns::project(&ColumnToggles::none()).is_empty());
}

#[test]
fn catalog_titles_and_widths() {
    let all = columns::project(&ColumnToggles::default());
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].title, "Id");
    assert_eq!(all[0].width, Some(150));
    assert_eq!(all[1].width, None);
    assert_eq!(all[2].width, Some(300));
    assert_eq!(all[4].field, "resolved_url");
    assert_eq!(all[4].width, Some(600));
}

#[test]
fn unknown_column_names_are_rejected() {
    let err = ColumnToggles::parse_csv("id,colour").unwrap_err();
    assert!(err.to_string().contains("colour"));
    // Titles work as well as field names.
    let toggles = ColumnToggles::parse_csv("Time Created, STATUS").unwrap();
    assert!(toggles.is_checked("tcreated").unwrap());
    assert!(toggles.is_checked("resolved_status").unwrap());
    assert_eq!(toggles.checked_count(), 2);
}

#[test]
fn last_resolved_detail_wins_even_if_requested_first() {
    let mut loader = DetailLoader::new(DetailPolicy::LastResolved);
    let mut view = DetailView::default();
    let a = loader.begin(RecordId::new("A"));
    let b = loader.begin(RecordId::new("B"));

    assert_eq!(
        loader.apply(&b, Ok(json!({"id": "B"})), &mut view),
        Applied::Shown
    );
    assert_eq!(
        loader.apply(&a, Ok(json!({"id": "A"})), &mut view),
        Applied::Shown
    );

    assert_eq!(view.record_id, Some(RecordId::new("A")));
    assert!(view.content.as_deref().unwrap().contains("\"A\""));
}

#[test]
fn last_requested_policy_drops_stale_details() {
    let mut loader = DetailLoader::new(DetailPolicy::LastRequested);
    let mut view = DetailView::default();
    let a = loader.begin(RecordId::new("A"));
    let b = loader.begin(RecordId::new("B"));

    loader.apply(&b, Ok(json!({"id": "B"})), &mut view);
    assert_eq!(
        loader.apply(&a, Ok(json!({"id": "A"})), &mut view),
        Applied::Stale
    );
    assert_eq!(view.record_id, Some(RecordId::new("B")));
}

#[test]
fn detail_is_pretty_printed_with_two_space_indent() {
    let mut loader = DetailLoader::default();
    let mut view = DetailView::default();
    let t = loader.begin(RecordId::new("x"));
    loader.apply(&t, Ok(json!({"id": "x", "nested": {"k": 1}})), &mut view);
    let content = view.content.unwrap();
    assert!(content.contains("\n  \"nested\": {\n    \"k\": 1\n  }"));
}

#[test]
fn failed_detail_keeps_previous_content() {
    let mut loader = DetailLoader::default();
    let mut view = DetailView::default();
    let ok = loader.begin(RecordId::new("good"));
    loader.apply(&ok, Ok(json!({"id": "good"})), &mut view);
    let before = view.content.clone();

    let bad = loader.begin(RecordId::new("bad"));
    let err = FetchError::Status {
        url: "http://localhost/thing/bad".to_string(),
        status: 500,
    };
    assert_eq!(loader.apply(&bad, Err(err), &mut view), Applied::Failed);
    assert_eq!(view.content, before);
    assert_eq!(view.record_id, Some(RecordId::new("good")));
    assert!(view.error.as_deref().unwrap().contains("bad"));
}

#[test]
fn session_start_requests_first_page_and_fills_grid() {
    let session = loaded_session(SessionOptions::default(), &["1", "2", "3"]);
    assert_eq!(session.feed().loaded(), 3);
    assert_eq!(session.feed().total(), 3);
    assert_eq!(session.grid().row_count(), 3);
}

#[test]
fn page_results_for_superseded_requests_are_dropped() {
    let mut session = Session::new(SessionOptions::default()).unwrap();
    let old = fetch_page(session.start().unwrap());
    let new = fetch_page(
        session
            .handle(UiEvent::NarrowingChanged {
                status: Some(404),
                authority: None,
            })
            .unwrap(),
    );
    assert_eq!(new.status, Some(404));

    session.complete(Completion::Page {
        request: old,
        result: Ok(page_of(&["stale"], 1)),
    });
    assert_eq!(session.feed().loaded(), 0);
    assert_eq!(session.grid().row_count(), 0);

    session.complete(Completion::Page {
        request: new,
        result: Ok(page_of(&["fresh"], 1)),
    });
    assert_eq!(session.feed().loaded(), 1);
}

#[test]
fn failed_page_is_reported_without_touching_counters() {
    let mut session = loaded_session(SessionOptions::default(), &["1"]);
    let request = fetch_page(session.handle(UiEvent::PageRequested { page: 2 }).unwrap());
    session.complete(Completion::Page {
        request,
        result: Err(FetchError::Status {
            url: "http://localhost/thing/".to_string(),
            status: 502,
        }),
    });
    assert_eq!(session.feed().loaded(), 1);
    assert!(session.feed().last_error().unwrap().contains("502"));
}

#[test]
fn report_without_selection_alerts_and_changes_nothing() {
    let mut session = loaded_session(SessionOptions::default(), &["42"]);
    session.handle(UiEvent::ReportOpened).unwrap();
    let before = session.report().state().clone();

    let err = session
        .handle(UiEvent::IssueSubmitted {
            body: "broken url".to_string(),
        })
        .unwrap_err();
    assert_eq!(err, SessionError::NoSelection);
    assert_eq!(err.to_string(), "Please choose a record!");
    assert_eq!(session.report().state(), &before);
    assert_eq!(session.detail(), &DetailView::default());
}

#[test]
fn report_after_selection_flags_the_row() {
    let mut session = loaded_session(SessionOptions::default(), &["41", "42"]);
    select(&mut session, "42");

    session.handle(UiEvent::ReportOpened).unwrap();
    session
        .handle(UiEvent::IssueSubmitted {
            body: "url does not resolve".to_string(),
        })
        .unwrap();
    session.handle(UiEvent::FeedbackConfirmed).unwrap();

    assert!(!session.report().is_open());
    assert!(session.grid().is_flagged(&RecordId::new("42")));
    assert!(!session.grid().is_flagged(&RecordId::new("41")));
    assert_eq!(session.issues().len(), 1);
    assert_eq!(session.issues()[0].body, "url does not resolve");

    assert_eq!(
        session.handle(UiEvent::FeedbackConfirmed),
        Err(SessionError::NothingToConfirm)
    );
}

#[test]
fn clicking_a_flagged_row_clears_the_detail_and_raises_the_notice() {
    let mut session = loaded_session(SessionOptions::default(), &["1", "2"]);
    let ticket = select(&mut session, "1");
    session.complete(Completion::Detail {
        ticket,
        result: Ok(json!({"id": "1"})),
    });
    session.handle(UiEvent::ReportOpened).unwrap();
    session
        .handle(UiEvent::IssueSubmitted {
            body: String::new(),
        })
        .unwrap();
    session.handle(UiEvent::FeedbackConfirmed).unwrap();

    let commands = session
        .handle(UiEvent::RowSelected {
            id: RecordId::new("1"),
        })
        .unwrap();
    assert!(commands.is_empty());
    assert!(session.has_bug_notice());
    assert_eq!(session.detail(), &DetailView::default());

    session.handle(UiEvent::NoticeDismissed).unwrap();
    assert!(!session.has_bug_notice());
}

#[test]
fn selection_overwrites_and_last_resolved_detail_stays() {
    let mut session = loaded_session(SessionOptions::default(), &["A", "B"]);
    let a = select(&mut session, "A");
    let b = select(&mut session, "B");
    assert_eq!(session.selection(), Some(&RecordId::new("B")));

    session.complete(Completion::Detail {
        ticket: b,
        result: Ok(json!({"id": "B"})),
    });
    session.complete(Completion::Detail {
        ticket: a,
        result: Ok(json!({"id": "A"})),
    });
    assert_eq!(session.detail().record_id, Some(RecordId::new("A")));
}

#[test]
fn applying_toggles_replaces_grid_columns() {
    let mut session = loaded_session(SessionOptions::default(), &["1"]);
    for field in ["authority_id", "resolved_status", "resolved_url", "resolve_elapsed"] {
        session
            .handle(UiEvent::ToggleChanged {
                field: field.to_string(),
                checked: false,
            })
            .unwrap();
    }
    // Toggling alone leaves the grid alone.
    assert_eq!(session.grid().columns().len(), 6);

    session.handle(UiEvent::TogglesApplied).unwrap();
    let fields: Vec<_> = session.grid().columns().iter().map(|c| c.field).collect();
    assert_eq!(fields, vec!["id", "tcreated"]);

    for field in ["id", "tcreated"] {
        session
            .handle(UiEvent::ToggleChanged {
                field: field.to_string(),
                checked: false,
            })
            .unwrap();
    }
    session.handle(UiEvent::TogglesApplied).unwrap();
    assert!(session.grid().columns().is_empty());
}

#[test]
fn filters_narrow_visible_rows_locally() {
    let mut session = loaded_session(
        SessionOptions::default(),
        &["ark:/21547/Abc", "ark:/21547/xyz", "IGSN:ABC123"],
    );
    session
        .handle(UiEvent::FilterApplied {
            field: "id".to_string(),
            op: FilterOp::Like,
            value: "abc".to_string(),
        })
        .unwrap();
    assert_eq!(session.grid().visible_rows().len(), 2);

    session
        .handle(UiEvent::FilterApplied {
            field: "id".to_string(),
            op: FilterOp::Starts,
            value: "igsn".to_string(),
        })
        .unwrap();
    assert_eq!(session.grid().visible_rows().len(), 1);

    let err = session
        .handle(UiEvent::FilterApplied {
            field: "id".to_string(),
            op: FilterOp::Regex,
            value: "(".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::Filter { .. }));

    session.handle(UiEvent::FilterCleared).unwrap();
    assert_eq!(session.grid().visible_rows().len(), 3);
}

#[test]
fn changing_panes_rebuilds_the_info_split() {
    let mut session = Session::new(SessionOptions::default()).unwrap();
    assert_eq!(session.layout().orientation(), Orientation::Horizontal);
    assert_eq!(session.layout().info().config().min_size, vec![200, 200]);

    session
        .handle(UiEvent::PanesChanged(Orientation::Vertical))
        .unwrap();
    assert_eq!(session.layout().orientation(), Orientation::Vertical);
    assert_eq!(session.layout().info().config().min_size, vec![100, 100]);
    assert_eq!(session.layout().info().config().gutter_size, 10);
    assert_eq!(session.layout().main().config().sizes, vec![30, 70]);
    assert!(session.layout().info().is_live());
}

#[test]
fn destroyed_split_is_no_longer_live() {
    let mut pane = SplitPane::init(crate::layout::info_split_config(Orientation::Horizontal))
        .unwrap();
    assert!(pane.is_live());
    pane.destroy();
    assert!(!pane.is_live());
}

#[test]
fn split_requires_two_panels_and_matching_sizes() {
    let lone = SplitConfig {
        panels: vec!["only"],
        direction: Orientation::Vertical,
        sizes: Vec::new(),
        min_size: Vec::new(),
        gutter_size: 10,
    };
    assert!(SplitPane::init(lone).is_err());

    let mismatched = SplitConfig {
        panels: vec!["a", "b"],
        direction: Orientation::Vertical,
        sizes: vec![100],
        min_size: Vec::new(),
        gutter_size: 10,
    };
    assert!(SplitPane::init(mismatched).is_err());
}

#[test]
fn split_partition_honors_percentages_and_minimums() {
    let layout = DashboardLayout::new(Orientation::Horizontal).unwrap();
    // 100 rows, gutter 30px at 10px per row takes 3.
    assert_eq!(layout.main().partition(100, 10), vec![29, 67]);
    // 30 columns cannot fit two 200px minimums; each panel still gets 20.
    let widths = layout.info().partition(30, 10);
    assert_eq!(widths, vec![20, 20]);
}

#[test]
fn numeric_ids_are_opaque_strings() {
    let r = record(json!({"id": 42, "resolved_status": null, "extra": {"a": [1]}}));
    assert_eq!(r.id(), Some(RecordId::new("42")));
    assert_eq!(r.cell("resolved_status"), "");
    assert_eq!(r.cell("extra"), "{\"a\":[1]}");
    assert_eq!(r.cell("missing"), "");
}

#[test]
fn table_grid_selection_is_single() {
    let mut grid = TableGrid::default();
    grid.append_rows(page_of(&["a", "b"], 2).data);
    grid.select_row(&RecordId::new("a"));
    grid.select_row(&RecordId::new("b"));
    let selected = grid.selected_rows();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id(), Some(RecordId::new("b")));
    assert_eq!(
        grid.visible_row(1).and_then(|r| r.id()),
        Some(RecordId::new("a"))
    );
    assert!(grid.visible_row(0).is_none());
}

#[test]
fn interactive_commands_become_events() {
    use crate::cli::commands::{parse, Input};

    assert_eq!(
        parse("filter abc").unwrap(),
        Input::Events(vec![UiEvent::FilterApplied {
            field: "id".to_string(),
            op: FilterOp::Like,
            value: "abc".to_string(),
        }])
    );
    assert_eq!(
        parse("filter resolved_status != 200").unwrap(),
        Input::Events(vec![UiEvent::FilterApplied {
            field: "resolved_status".to_string(),
            op: FilterOp::Ne,
            value: "200".to_string(),
        }])
    );
    assert_eq!(
        parse("page 3").unwrap(),
        Input::Events(vec![UiEvent::PageRequested { page: 3 }])
    );
    assert_eq!(parse("row 2").unwrap(), Input::Row(2));
    assert_eq!(parse("status -").unwrap(), Input::Status(None));
    assert_eq!(parse("logout").unwrap(), Input::Quit);
    assert_eq!(parse("   ").unwrap(), Input::Empty);
    assert!(parse("page zero").is_err());
    assert!(parse("columns id,colour").is_err());
    assert!(parse("frobnicate").is_err());
}

#[test]
fn columns_command_resets_toggles_then_applies() {
    let input = crate::cli::commands::parse("columns tcreated, id").unwrap();
    let crate::cli::commands::Input::Events(events) = input else {
        panic!("expected events");
    };
    let mut session = loaded_session(SessionOptions::default(), &["1"]);
    for event in events {
        session.handle(event).unwrap();
    }
    let fields: Vec<_> = session.grid().columns().iter().map(|c| c.field).collect();
    assert_eq!(fields, vec!["id", "tcreated"]);
}

#[test]
fn text_export_projects_visible_columns() {
    let mut session = loaded_session(SessionOptions::default(), &["a", "b"]);
    for event in [
        UiEvent::ToggleChanged {
            field: "authority_id".to_string(),
            checked: false,
        },
        UiEvent::ToggleChanged {
            field: "resolved_url".to_string(),
            checked: false,
        },
        UiEvent::TogglesApplied,
    ] {
        session.handle(event).unwrap();
    }
    let text = String::from_utf8(
        crate::output::export_rows(session.grid(), crate::output::OutputFormat::Text).unwrap(),
    )
    .unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "id\ttcreated\tresolved_status\tresolve_elapsed");
    assert_eq!(lines[1], "a\t2021-03-04T05:06:07\t200\t0.25");
    assert_eq!(lines.len(), 3);

    let json: serde_json::Value = serde_json::from_slice(
        &crate::output::export_rows(session.grid(), crate::output::OutputFormat::Json).unwrap(),
    )
    .unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["resolved_url"], "https://example.org/b");
}

#[test]
fn types_table_lists_counts() {
    let types = vec![
        crate::model::ThingType {
            item_type: "Sample".to_string(),
            count: 12,
        },
        crate::model::ThingType {
            item_type: "Specimen".to_string(),
            count: 3,
        },
    ];
    let out = crate::output::render_types(&types);
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[0].starts_with("Item Types"));
    assert!(lines[1].starts_with("Sample"));
    assert!(lines[1].trim_end().ends_with("12"));
    assert!(crate::output::render_types(&[]).contains("No data available"));
}

#[test]
fn dashboard_marks_selected_and_flagged_rows() {
    colored::control::set_override(false);
    let mut session = loaded_session(SessionOptions::default(), &["1", "2"]);
    select(&mut session, "2");
    let screen = crate::output::dashboard::render(
        &session,
        crate::output::dashboard::Viewport {
            width: 200,
            height: 40,
        },
    );
    assert!(screen.starts_with("Records loaded: 2  Total records: 2"));
    assert!(screen.lines().any(|l| l.starts_with(">     2")));
    assert!(screen.contains("(no record selected)"));
}

#[test]
fn default_config_file_parses() {
    let cfg = crate::config::parse_config(&crate::config::default_config_yaml()).unwrap();
    assert_eq!(cfg.base_url.as_deref(), Some("https://mars.cyverse.org"));
    assert_eq!(cfg.page_size, Some(1000));
    assert_eq!(cfg.columns.as_ref().map(Vec::len), Some(6));
    assert_eq!(cfg.detail_policy.as_deref(), Some("last-resolved"));
    assert_eq!(
        crate::config::parse_config("").unwrap(),
        crate::config::ConfigFile::default()
    );
    assert!(crate::config::parse_config("page_size: many").is_err());
}

#[test]
fn reloading_a_page_does_not_end_the_feed() {
    let mut adapter = FeedAdapter::new(1000, Narrowing::default()).unwrap();
    for _ in 0..3 {
        adapter.request_page(1).unwrap();
        let mut response = page_of(&["a"; 1000], 3000);
        response.last_page = Some(3);
        adapter.on_response(response);
    }
    assert_eq!(adapter.loaded(), 3000);
    assert_eq!(adapter.total(), 3000);
    assert_eq!(adapter.next_page(), Some(2));
}

#[test]
fn without_last_page_the_end_follows_pages_covered() {
    let mut adapter = FeedAdapter::new(2, Narrowing::default()).unwrap();
    adapter.request_page(1).unwrap();
    adapter.on_response(page_of(&["a", "b"], 4));
    adapter.request_page(1).unwrap();
    adapter.on_response(page_of(&["a", "b"], 4));
    // loaded has reached total, but page 2 was never fetched.
    assert_eq!(adapter.loaded(), 4);
    assert_eq!(adapter.next_page(), Some(2));

    adapter.request_next().unwrap();
    adapter.on_response(page_of(&["c", "d"], 4));
    assert_eq!(adapter.next_page(), None);
}

fn ids_in_grid(session: &Session) -> Vec<String> {
    session
        .grid()
        .visible_rows()
        .iter()
        .filter_map(|r| r.id())
        .map(|id| id.to_string())
        .collect()
}

fn complete_page(session: &mut Session, event: UiEvent, ids: &[&str], total: u64) {
    let request = fetch_page(session.handle(event).unwrap());
    session.complete(Completion::Page {
        request,
        result: Ok(page_of(ids, total)),
    });
}

#[test]
fn reloaded_page_replaces_rows_instead_of_duplicating() {
    let mut session = loaded_session(
        SessionOptions {
            page_size: 2,
            ..SessionOptions::default()
        },
        &["a", "b"],
    );
    complete_page(&mut session, UiEvent::PageRequested { page: 1 }, &["a", "b"], 6);
    assert_eq!(ids_in_grid(&session), vec!["a", "b"]);

    complete_page(&mut session, UiEvent::NextPage, &["c", "d"], 6);
    assert_eq!(ids_in_grid(&session), vec!["a", "b", "c", "d"]);
}

#[test]
fn jumping_to_a_page_shows_only_that_page() {
    let mut session = loaded_session(
        SessionOptions {
            page_size: 2,
            ..SessionOptions::default()
        },
        &["a", "b"],
    );
    select(&mut session, "e");
    complete_page(&mut session, UiEvent::PageRequested { page: 3 }, &["e", "f"], 8);
    assert_eq!(ids_in_grid(&session), vec!["e", "f"]);
    assert_eq!(session.grid().selected_rows().len(), 1);

    complete_page(&mut session, UiEvent::NextPage, &["g", "h"], 8);
    assert_eq!(ids_in_grid(&session), vec!["e", "f", "g", "h"]);
    assert_eq!(session.feed().loaded(), 6);
}

#[test]
fn issue_needs_an_open_report() {
    let mut session = loaded_session(SessionOptions::default(), &["42"]);
    select(&mut session, "42");

    let err = session
        .handle(UiEvent::IssueSubmitted {
            body: "broken".to_string(),
        })
        .unwrap_err();
    assert_eq!(err, SessionError::ReportNotOpen);
    assert!(!session.report().is_open());

    session.handle(UiEvent::ReportOpened).unwrap();
    session
        .handle(UiEvent::IssueSubmitted {
            body: "broken".to_string(),
        })
        .unwrap();
    // A second submit while awaiting feedback is refused too.
    assert_eq!(
        session.handle(UiEvent::IssueSubmitted {
            body: "again".to_string(),
        }),
        Err(SessionError::ReportNotOpen)
    );
    session.handle(UiEvent::FeedbackConfirmed).unwrap();
    assert_eq!(session.issues()[0].body, "broken");
}

#[test]
fn json_encoding_failures_are_reported() {
    let mut bad = std::collections::BTreeMap::new();
    bad.insert(vec![1u8], 1u8);
    let err = crate::output::render_json(&bad).unwrap_err();
    assert!(err.contains("failed to encode JSON"));

    let ok = crate::output::render_json(&["x"]).unwrap();
    assert_eq!(ok, b"[\n  \"x\"\n]\n");
}
