use std::io::Cursor;

use crate::intake::catalog::FieldCatalog;
use crate::intake::domain::{ApplicationData, FieldName};
use crate::intake::records::{check_drafts, drafts_from_csv, drafts_from_json, RecordImportError};

#[test]
fn json_array_is_checked_record_by_record() {
    let valid = serde_json::to_value(ApplicationData::default()).expect("serializes");
    let mut under_age = valid.clone();
    under_age["applicant_id"] = "APP00017".into();
    under_age["age"] = 18.into();
    under_age["province"] = "XX".into();
    let body = serde_json::Value::Array(vec![valid, under_age]).to_string();

    let drafts = drafts_from_json(Cursor::new(body)).expect("parses");
    let checks = check_drafts(drafts, &FieldCatalog::standard());

    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].outcome, Ok(ApplicationData::default()));
    assert_eq!(checks[1].position, 2);
    assert_eq!(checks[1].applicant_id(), "APP00017");
    let report = checks[1].outcome.as_ref().expect_err("invalid record");
    assert_eq!(report.message_for(FieldName::Age), Some("Must be at least 19 years old"));
    assert_eq!(report.message_for(FieldName::Province), Some("Invalid province"));
}

#[test]
fn json_missing_and_null_fields_are_required() {
    let drafts = drafts_from_json(Cursor::new(r#"{"applicant_id": "APP1", "age": null}"#))
        .expect("parses");
    let checks = check_drafts(drafts, &FieldCatalog::standard());
    let report = checks[0].outcome.as_ref().expect_err("incomplete");
    assert_eq!(report.errors.len(), FieldName::COUNT - 1);
    assert_eq!(report.message_for(FieldName::Age), Some("Required"));
}

#[test]
fn json_scalar_is_rejected() {
    match drafts_from_json(Cursor::new("42")) {
        Err(RecordImportError::UnexpectedJsonShape) => {}
        other => panic!("expected shape error, got {other:?}"),
    }
}

#[test]
fn csv_headers_map_onto_fields() {
    let csv = "\
applicant_id,annual_income,self_reported_debt,self_reported_expenses,requested_amount,age,province,employment_status,months_employed,credit_score,total_credit_limit,credit_utilization,num_open_accounts,num_credit_inquiries,payment_history,monthly_expenses,notes
APP00001, 60000,1000,2000,10000,35,ON,Full-time,24,700,15000,30,3,1,On Time,2500,ignored
APP00002,60000,1000,2000,10000,35,BC,Retired,24,250,15000,30,3,1,Late >60,2500,
";
    let drafts = drafts_from_csv(Cursor::new(csv)).expect("csv parses");
    let checks = check_drafts(drafts, &FieldCatalog::standard());

    assert_eq!(checks.len(), 2);
    let first = checks[0].outcome.as_ref().expect("first row valid");
    assert_eq!(first.applicant_id, "APP00001");
    assert_eq!(first.annual_income, 60_000.0);

    let report = checks[1].outcome.as_ref().expect_err("second row invalid");
    assert_eq!(
        report.message_for(FieldName::EmploymentStatus),
        Some("Invalid employment status")
    );
    assert_eq!(report.message_for(FieldName::CreditScore), Some("Must be at least 300"));
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn csv_with_only_some_columns_reports_the_rest() {
    let drafts = drafts_from_csv(Cursor::new("applicant_id,credit_score\nAPP00009,712\n"))
        .expect("csv parses");
    let checks = check_drafts(drafts, &FieldCatalog::standard());
    let report = checks[0].outcome.as_ref().expect_err("incomplete row");
    assert_eq!(report.message_for(FieldName::CreditScore), None);
    assert_eq!(report.message_for(FieldName::AnnualIncome), Some("Required"));
}
