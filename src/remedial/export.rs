//! CSV rendering of the remedial-action list for download.

use super::domain::RemedialAction;

/// Render the given actions (already filtered/sorted by the caller) as a
/// CSV document.
pub fn to_csv(actions: &[RemedialAction]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "Tytuł",
        "Opis",
        "Priorytet",
        "Status",
        "Termin",
        "Przypisane do",
    ])?;

    for action in actions {
        let due = action.due_date.format("%Y-%m-%d").to_string();
        writer.write_record([
            action.title.as_str(),
            action.description.as_str(),
            action.priority.label(),
            action.status.label(),
            due.as_str(),
            action.assigned_to.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| error.into_error().into())
}
