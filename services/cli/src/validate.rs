use std::path::PathBuf;

use clap::Args;
use credit_intake::error::AppError;
use credit_intake::intake::records::{check_file, RecordCheck};
use credit_intake::intake::FieldCatalog;
use serde_json::{json, Value};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// JSON (object or array) or CSV file of applicant records
    pub(crate) path: PathBuf,
    /// Emit the results as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let checks = check_file(&args.path, &FieldCatalog::standard())?;
    let rejected = checks.iter().filter(|check| !check.is_valid()).count();
    info!(
        path = %args.path.display(),
        total = checks.len(),
        rejected,
        "applicant records checked"
    );

    if args.json {
        println!("{:#}", render_json(&checks));
    } else {
        println!("{}", render_text(&checks));
    }

    if rejected > 0 {
        return Err(AppError::InvalidRecords {
            rejected,
            total: checks.len(),
        });
    }
    Ok(())
}

pub(crate) fn render_text(checks: &[RecordCheck]) -> String {
    let mut lines = Vec::new();
    for check in checks {
        let id = display_id(check);
        match &check.outcome {
            Ok(_) => lines.push(format!("#{} {id}: ok", check.position)),
            Err(report) => {
                lines.push(format!("#{} {id}: {} problem(s)", check.position, report.errors.len()));
                for error in &report.errors {
                    lines.push(format!("    {}: {}", error.field.key(), error.message));
                }
            }
        }
    }
    let valid = checks.iter().filter(|check| check.is_valid()).count();
    lines.push(format!("{valid} of {} record(s) valid", checks.len()));
    lines.join("\n")
}

pub(crate) fn render_json(checks: &[RecordCheck]) -> Value {
    let records: Vec<Value> = checks
        .iter()
        .map(|check| match &check.outcome {
            Ok(application) => json!({
                "position": check.position,
                "applicant_id": check.applicant_id(),
                "valid": true,
                "application": application,
            }),
            Err(report) => json!({
                "position": check.position,
                "applicant_id": check.applicant_id(),
                "valid": false,
                "errors": report.errors,
            }),
        })
        .collect();
    Value::Array(records)
}

fn display_id(check: &RecordCheck) -> &str {
    match check.applicant_id().trim() {
        "" => "(no applicant id)",
        id => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_intake::intake::records::{check_drafts, drafts_from_csv};

    const ROWS: &str = "applicant_id,annual_income,age,province\n\
                        APP1,60000,35,ON\n\
                        ,900,18,ZZ\n";

    fn checks() -> Vec<RecordCheck> {
        let drafts = drafts_from_csv(ROWS.as_bytes()).expect("csv parses");
        check_drafts(drafts, &FieldCatalog::standard())
    }

    #[test]
    fn text_lists_problems_per_record() {
        let text = render_text(&checks());
        assert!(text.contains("#2 (no applicant id):"));
        assert!(text.contains("    age: Must be at least 19 years old"));
        assert!(text.contains("    province: Invalid province"));
        assert!(text.ends_with("0 of 2 record(s) valid"));
    }

    #[test]
    fn json_marks_validity_per_record() {
        let value = render_json(&checks());
        assert_eq!(value[0]["applicant_id"], json!("APP1"));
        assert_eq!(value[1]["valid"], json!(false));
        assert_eq!(value[1]["errors"][0]["field"], json!("applicant_id"));
        assert_eq!(value[1]["errors"][0]["message"], json!("Required"));
    }
}
