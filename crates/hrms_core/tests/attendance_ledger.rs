use hrms_core::db::open_db_in_memory;
use hrms_core::model::attendance::day_bounds_ms;
use hrms_core::{
    AttendanceFilter, AttendanceLedger, AttendanceRepository, AttendanceStatus, ConflictKind,
    Employee, EmployeeDirectory, EmployeeDraft, MarkAttendance, MarkAttendanceDraft, RepoError,
    SqliteAttendanceRepository, SqliteEmployeeRepository, StatusUpdateDraft,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

type Ledger<'a> = AttendanceLedger<SqliteEmployeeRepository<'a>, SqliteAttendanceRepository<'a>>;

fn ledger(conn: &Connection) -> Ledger<'_> {
    AttendanceLedger::new(
        SqliteEmployeeRepository::try_new(conn).unwrap(),
        SqliteAttendanceRepository::try_new(conn).unwrap(),
    )
}

fn create_employee(conn: &Connection, code: &str, email: &str) -> Employee {
    let directory = EmployeeDirectory::new(SqliteEmployeeRepository::try_new(conn).unwrap());
    directory
        .create(&EmployeeDraft {
            employee_id: Some(code.to_string()),
            full_name: Some("Jane Doe".to_string()),
            email: Some(email.to_string()),
            department: Some("Engineering".to_string()),
        })
        .unwrap()
}

fn mark_draft(employee_id: Uuid, date: &str, status: &str) -> MarkAttendanceDraft {
    MarkAttendanceDraft {
        employee_id: Some(employee_id.to_string()),
        date: Some(date.to_string()),
        status: Some(status.to_string()),
    }
}

fn day(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

#[test]
fn mark_returns_record_resolved_with_employee_fields() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    assert_eq!(record.employee_id, employee.id);
    assert_eq!(record.date, day("2024-01-10"));
    assert_eq!(record.status, AttendanceStatus::Present);

    let resolved = record.employee.expect("employee should resolve");
    assert_eq!(resolved.employee_id, "EMP001");
    assert_eq!(resolved.full_name, "Jane Doe");
    assert_eq!(resolved.department, "Engineering");
}

#[test]
fn second_mark_for_same_day_conflicts_whatever_the_status() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();
    let err = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Absent"))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Conflict(ConflictKind::AttendanceDay)
    ));
}

#[test]
fn timestamp_input_normalizes_to_the_same_calendar_day() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    // Same day, sent as a timestamp with a time-of-day component.
    let err = ledger
        .mark(&mark_draft(
            employee.id,
            "2024-01-10T14:30:00+00:00",
            "Present",
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Conflict(ConflictKind::AttendanceDay)
    ));
}

#[test]
fn mark_for_unknown_employee_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    let missing = Uuid::new_v4();
    let err = ledger
        .mark(&mark_draft(missing, "2024-01-10", "Present"))
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn unknown_employee_outranks_malformed_date_and_status() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);
    let missing = Uuid::new_v4();

    let err = ledger
        .mark(&mark_draft(missing, "not-a-date", "Present"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));

    let err = ledger
        .mark(&mark_draft(missing, "2024-01-10", "Late"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn known_employee_with_malformed_date_is_still_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let err = ledger
        .mark(&mark_draft(employee.id, "not-a-date", "Present"))
        .unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert_eq!(validation.fields(), vec!["date"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_employee_reference_reports_all_failing_fields() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    let draft = MarkAttendanceDraft {
        employee_id: Some("not-a-uuid".to_string()),
        date: Some("not-a-date".to_string()),
        status: Some("Present".to_string()),
    };

    let err = ledger.mark(&draft).unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert_eq!(validation.fields(), vec!["employeeId", "date"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mark_with_missing_fields_reports_all_of_them() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    let err = ledger.mark(&MarkAttendanceDraft::default()).unwrap_err();
    match err {
        RepoError::Validation(validation) => {
            assert_eq!(validation.fields(), vec!["employeeId", "date", "status"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_insert_is_rejected_by_the_unique_index_without_pre_check() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let repo = SqliteAttendanceRepository::try_new(&conn).unwrap();

    // Bypass the ledger pre-check entirely, simulating the losing side of
    // a concurrent race: the store constraint must still answer Conflict.
    let mark = MarkAttendance {
        employee_id: employee.id,
        day: day("2024-01-10"),
        status: AttendanceStatus::Present,
    };
    repo.insert_attendance(&mark).unwrap();
    let err = repo.insert_attendance(&mark).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Conflict(ConflictKind::AttendanceDay)
    ));
}

#[test]
fn update_status_toggles_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    let absent = StatusUpdateDraft {
        status: Some("Absent".to_string()),
    };
    let toggled = ledger.update_status(record.id, &absent).unwrap();
    assert_eq!(toggled.status, AttendanceStatus::Absent);

    let again = ledger.update_status(record.id, &absent).unwrap();
    assert_eq!(again.status, AttendanceStatus::Absent);
    assert_eq!(again.date, record.date);
    assert_eq!(again.employee_id, record.employee_id);
}

#[test]
fn update_status_requires_a_status() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    let err = ledger
        .update_status(record.id, &StatusUpdateDraft::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn update_unknown_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let ledger = ledger(&conn);

    let missing = Uuid::new_v4();
    let err = ledger
        .update_status(
            missing,
            &StatusUpdateDraft {
                status: Some("Present".to_string()),
            },
        )
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn delete_removes_record_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    ledger.delete(record.id).unwrap();
    assert!(ledger.get(record.id).unwrap().is_none());

    let err = ledger.delete(record.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == record.id));
}

#[test]
fn deleting_the_employee_leaves_records_with_unresolved_marker() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();
    assert!(record.employee.is_some());

    let directory = EmployeeDirectory::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    directory.delete(employee.id).unwrap();

    let listed = ledger.list(&AttendanceFilter::default()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert!(listed[0].employee.is_none());
}

#[test]
fn list_orders_newest_day_first_and_filters_by_employee() {
    let conn = open_db_in_memory().unwrap();
    let first = create_employee(&conn, "EMP001", "jane@co.com");
    let second = create_employee(&conn, "EMP002", "john@co.com");
    let ledger = ledger(&conn);

    ledger
        .mark(&mark_draft(first.id, "2024-01-10", "Present"))
        .unwrap();
    ledger
        .mark(&mark_draft(first.id, "2024-01-12", "Absent"))
        .unwrap();
    ledger
        .mark(&mark_draft(second.id, "2024-01-11", "Present"))
        .unwrap();

    let all = ledger.list(&AttendanceFilter::default()).unwrap();
    let days: Vec<_> = all.iter().map(|record| record.date).collect();
    assert_eq!(
        days,
        vec![day("2024-01-12"), day("2024-01-11"), day("2024-01-10")]
    );

    let only_first = ledger
        .list(&AttendanceFilter {
            employee_id: Some(first.id),
            day: None,
        })
        .unwrap();
    assert_eq!(only_first.len(), 2);
    assert!(only_first
        .iter()
        .all(|record| record.employee_id == first.id));
}

#[test]
fn day_filter_matches_rows_carrying_a_time_component() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");

    // A legacy row stored with a time-of-day offset inside the same day.
    let (start_ms, _) = day_bounds_ms(day("2024-01-10"));
    conn.execute(
        "INSERT INTO attendance (uuid, employee_uuid, date_ms, status)
         VALUES (?1, ?2, ?3, 'present');",
        params![
            Uuid::new_v4().to_string(),
            employee.id.to_string(),
            start_ms + 9 * 60 * 60 * 1000,
        ],
    )
    .unwrap();

    let ledger = ledger(&conn);
    let matched = ledger
        .list(&AttendanceFilter {
            employee_id: None,
            day: Some(day("2024-01-10")),
        })
        .unwrap();
    assert_eq!(matched.len(), 1);

    let other_day = ledger
        .list(&AttendanceFilter {
            employee_id: None,
            day: Some(day("2024-01-11")),
        })
        .unwrap();
    assert!(other_day.is_empty());
}

#[test]
fn list_for_employee_counts_present_days() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();
    ledger
        .mark(&mark_draft(employee.id, "2024-01-11", "Absent"))
        .unwrap();
    ledger
        .mark(&mark_draft(employee.id, "2024-01-12", "Present"))
        .unwrap();

    let view = ledger.list_for_employee(employee.id).unwrap();
    assert_eq!(view.records.len(), 3);
    assert_eq!(view.total_present, 2);
    assert_eq!(view.records[0].date, day("2024-01-12"));
}

#[test]
fn summary_counts_always_add_up() {
    let conn = open_db_in_memory().unwrap();
    let first = create_employee(&conn, "EMP001", "jane@co.com");
    let second = create_employee(&conn, "EMP002", "john@co.com");
    let ledger = ledger(&conn);

    ledger
        .mark(&mark_draft(first.id, "2024-01-10", "Present"))
        .unwrap();
    ledger
        .mark(&mark_draft(second.id, "2024-01-10", "Absent"))
        .unwrap();
    ledger
        .mark(&mark_draft(first.id, "2024-01-11", "Absent"))
        .unwrap();

    let summary = ledger.summary().unwrap();
    assert_eq!(summary.total_employees, 2);
    assert_eq!(summary.total_attendance_records, 3);
    assert_eq!(summary.total_present, 1);
    assert_eq!(summary.total_absent, 2);
    assert_eq!(
        summary.total_present + summary.total_absent,
        summary.total_attendance_records
    );
}

#[test]
fn end_to_end_scenario_mark_conflict_toggle_summary() {
    let conn = open_db_in_memory().unwrap();
    let employee = create_employee(&conn, "EMP001", "jane@co.com");
    let ledger = ledger(&conn);

    let record = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Present"))
        .unwrap();

    let remark = ledger
        .mark(&mark_draft(employee.id, "2024-01-10", "Absent"))
        .unwrap_err();
    assert!(matches!(
        remark,
        RepoError::Conflict(ConflictKind::AttendanceDay)
    ));

    let toggled = ledger
        .update_status(
            record.id,
            &StatusUpdateDraft {
                status: Some("Absent".to_string()),
            },
        )
        .unwrap();
    assert_eq!(toggled.status, AttendanceStatus::Absent);

    let summary = ledger.summary().unwrap();
    assert_eq!(summary.total_employees, 1);
    assert_eq!(summary.total_attendance_records, 1);
    assert_eq!(summary.total_present, 0);
    assert_eq!(summary.total_absent, 1);
}
