use chrono::{Days, NaiveDate};
use pharmaqr_core::{new_tablet_id, present, ExpiryStatus, TabletRecord};

fn record_expiring(expiry_date: NaiveDate) -> TabletRecord {
    TabletRecord {
        id: new_tablet_id(),
        name: "Ibuprofen".to_string(),
        manufacturer: "Contoso Health".to_string(),
        batch_number: "IBU-77".to_string(),
        mfg_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        expiry_date,
        composition: "Ibuprofen 400mg".to_string(),
        dosage: "1 tablet every 6 hours".to_string(),
        use_cases: "Inflammation".to_string(),
        side_effects: String::new(),
        precautions: "Take with food".to_string(),
        storage_instructions: String::new(),
        created_at: 0,
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()
}

#[test]
fn ten_days_out_is_expiring_soon() {
    let record = record_expiring(as_of().checked_add_days(Days::new(10)).unwrap());
    let model = present(&record, as_of());
    assert_eq!(model.days_to_expiry, 10);
    assert_eq!(model.status, ExpiryStatus::ExpiringSoon);
}

#[test]
fn one_day_past_is_expired() {
    let record = record_expiring(as_of().checked_sub_days(Days::new(1)).unwrap());
    let model = present(&record, as_of());
    assert_eq!(model.days_to_expiry, -1);
    assert_eq!(model.status, ExpiryStatus::Expired);
}

#[test]
fn sixty_days_out_is_ok() {
    let record = record_expiring(as_of().checked_add_days(Days::new(60)).unwrap());
    let model = present(&record, as_of());
    assert_eq!(model.days_to_expiry, 60);
    assert_eq!(model.status, ExpiryStatus::Ok);
}

#[test]
fn expiry_day_itself_is_expiring_soon() {
    let record = record_expiring(as_of());
    let model = present(&record, as_of());
    assert_eq!(model.days_to_expiry, 0);
    assert_eq!(model.status, ExpiryStatus::ExpiringSoon);
}

#[test]
fn fields_pass_through_with_display_dates() {
    let record = record_expiring(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    let model = present(&record, as_of());

    assert_eq!(model.id, record.id.to_string());
    assert_eq!(model.name, record.name);
    assert_eq!(model.precautions, record.precautions);
    assert_eq!(model.mfg_date, "2023-03-01");
    assert_eq!(model.expiry_date, "2026-01-05");
    assert_eq!(model.mfg_date_display, "01 March 2023");
    assert_eq!(model.expiry_date_display, "05 January 2026");
    assert_eq!(model.as_of, "2025-02-20");
}

#[test]
fn only_non_empty_optional_sections_are_listed() {
    let record = record_expiring(as_of());
    let model = present(&record, as_of());

    let titles: Vec<_> = model.sections().iter().map(|section| section.title).collect();
    assert_eq!(titles, vec!["Precautions"]);
    assert_eq!(model.sections()[0].body, "Take with food");
}

#[test]
fn display_model_serializes_status_as_snake_case() {
    let record = record_expiring(as_of().checked_add_days(Days::new(3)).unwrap());
    let json = serde_json::to_value(present(&record, as_of())).unwrap();
    assert_eq!(json["status"], "expiring_soon");
    assert_eq!(json["days_to_expiry"], 3);
}
