use std::io::Write;

use crate::domain::Application;

/// Write applications as CSV for staff download. Read-only projection;
/// filtering happens before the rows reach here.
pub fn write_applications_csv<W: Write>(
    applications: &[Application],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "application_id",
        "job_id",
        "student_id",
        "status",
        "applied_at",
    ])?;

    for application in applications {
        csv_writer.write_record([
            application.id.0.as_str(),
            application.job_id.0.as_str(),
            application.student_id.0.as_str(),
            application.status.label(),
            application.applied_at.to_rfc3339().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
