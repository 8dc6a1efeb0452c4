use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(size) = args.page_size {
        if size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, pages start at 1".to_string());
        }
    }
    if let Some(raw) = args.columns.as_deref() {
        crate::columns::ColumnToggles::parse_csv(raw)
            .map_err(|e| format!("invalid --columns '{raw}': {e}"))?;
    }
    if let Some(raw) = args.detail_policy.as_deref() {
        if crate::detail::DetailPolicy::parse(raw).is_none() {
            return Err(format!(
                "invalid --detail-policy '{raw}', expected last-resolved or last-requested"
            ));
        }
    }
    if let Some(raw) = args.orientation.as_deref() {
        crate::layout::Orientation::parse(raw).map_err(|e| e.to_string())?;
    }
    if let Some(raw) = args.export_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!("invalid --export-format '{raw}', expected text or json"));
        }
    }
    if args.export.is_some() && args.page.is_none() {
        return Err("--export requires --page".to_string());
    }
    let one_shots = [args.page.is_some(), args.show.is_some(), args.types]
        .iter()
        .filter(|set| **set)
        .count();
    if one_shots > 1 {
        return Err("use only one of --page, --show and --types".to_string());
    }
    Ok(())
}
