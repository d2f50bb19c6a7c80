use bonusmodel_core::{
    BonusConfig, BonusEngine, Category, Classify, FixedCalendar, RtotalAdjustment, RtotalOutcome,
    TimeEntry, Timesheet, UnclassifiedLedger,
};
use bonusmodel_rules::{Classifier, CodeTable};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn billable(y: i32, m: u32, d: u32, hours: f64) -> TimeEntry {
    TimeEntry::new(date(y, m, d), hours, "P-100", "10", "Utveckling").invoiceable(true)
}

fn vacation(y: i32, m: u32, d: u32) -> TimeEntry {
    TimeEntry::new(date(y, m, d), 8.0, "Frånvaro", "1", "Semester").internal_job(true)
}

fn flat_calendar() -> FixedCalendar {
    FixedCalendar::new().with_year(2024, [168; 12])
}

/// Twenty billable days and one vacation day right after.
#[test]
fn test_vacation_after_billable_month() {
    let mut entries: Vec<TimeEntry> = (1..=20).map(|d| billable(2024, 3, d, 8.0)).collect();
    entries.push(vacation(2024, 3, 21));
    let sheet = Timesheet::from_entries(entries).unwrap();

    let cfg = BonusConfig::default();
    let engine = BonusEngine::new(Classifier::default(), flat_calendar(), &cfg);
    let mut ledger = UnclassifiedLedger::new();
    let report = engine.run(&sheet, &mut ledger).unwrap();

    let march = &report.years[0].months[0];
    assert_eq!(march.totals.bonus_hours, 168.0);
    assert_eq!(march.rtotal, RtotalOutcome::Earned { excess_hours: 0.0 });
    assert_eq!(march.rlon_hours, 38.0);
    assert_eq!(march.rlinear_hours, 30.0);
    assert!(ledger.is_empty());

    let last = march.entries.last().unwrap();
    assert_eq!(last.category, Category::Vacation);
    assert_eq!(last.effective_label(), "vacation, bonus-eligible");
}

#[test]
fn test_retroactive_year_through_engine() {
    let mut entries: Vec<TimeEntry> = (1..=9).map(|m| billable(2024, m, 2, 168.0)).collect();
    entries.extend((10..=12).map(|m| billable(2024, m, 2, 156.0)));
    let sheet = Timesheet::from_entries(entries).unwrap();

    let cfg = BonusConfig::default();
    let engine = BonusEngine::new(Classifier::default(), flat_calendar(), &cfg);
    let report = engine.run(&sheet, &mut UnclassifiedLedger::new()).unwrap();

    let year = &report.years[0];
    assert_eq!(year.verdict.bonus_hours, 1980.0);
    assert_eq!(year.verdict.qualifying_months, 9);
    assert_eq!(year.verdict.rtotal_count, 11.0);
    assert_eq!(
        year.verdict.adjustment,
        RtotalAdjustment::Retroactive { granted: 2, cap: 11 }
    );
    assert_eq!(year.verdict.rlinear_hours, 9.0 * 38.0 + 3.0 * 26.0);
    assert_eq!(year.payout.current, 11.0 * 2000.0 + 420.0 * 40.0);
}

#[test]
fn test_full_year_counts_twelve() {
    let entries: Vec<TimeEntry> = (1..=12).map(|m| billable(2024, m, 2, 168.0)).collect();
    let sheet = Timesheet::from_entries(entries).unwrap();

    let cfg = BonusConfig::default();
    let engine = BonusEngine::new(Classifier::default(), flat_calendar(), &cfg);
    let report = engine.run(&sheet, &mut UnclassifiedLedger::new()).unwrap();

    assert_eq!(report.years[0].verdict.rtotal_count, 12.0);
}

/// Unknown work lands in the ledger; an override fixes it on the next run.
#[test]
fn test_override_resolves_unclassified_work() {
    let unknown = TimeEntry::new(date(2024, 5, 6), 8.0, "K-77", "3", "Workshop")
        .with_job_name("Kund AB")
        .with_description("Förstudie");
    let sheet = Timesheet::from_entries(vec![unknown.clone()]).unwrap();
    let cfg = BonusConfig::default();

    let mut classifier = Classifier::new(CodeTable::default());
    let mut ledger = UnclassifiedLedger::new();
    {
        let engine = BonusEngine::new(&classifier, flat_calendar(), &cfg);
        let report = engine.run(&sheet, &mut ledger).unwrap();
        assert_eq!(report.years[0].months[0].totals.bonus_hours, 0.0);
    }

    let groups = ledger.finalize();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].job, "K-77");
    assert_eq!(groups[0].job_name, "Kund AB");
    assert_eq!(groups[0].tasks, vec!["Workshop".to_string()]);

    classifier
        .add_mapping(Category::Billable, "K-77", Some("3"), Some("Workshop"))
        .unwrap();
    assert_eq!(classifier.classify(&unknown), Category::Billable);

    let mut ledger = UnclassifiedLedger::new();
    let engine = BonusEngine::new(&classifier, flat_calendar(), &cfg);
    let report = engine.run(&sheet, &mut ledger).unwrap();
    assert!(ledger.is_empty());
    assert_eq!(report.years[0].months[0].totals.billed_hours, 8.0);
}

#[test]
fn test_internal_time_and_childcare_leave() {
    let entries = vec![
        billable(2024, 6, 3, 120.0),
        TimeEntry::new(date(2024, 6, 4), 16.0, "Internt", "1", "Bonusgrundande").internal_job(true),
        TimeEntry::new(date(2024, 6, 5), 8.0, "Internt", "1", "Möte").internal_job(true),
        TimeEntry::new(date(2024, 6, 6), 24.0, "Frånvaro", "1", "VAB").internal_job(true),
    ];
    let sheet = Timesheet::from_entries(entries).unwrap();

    let cfg = BonusConfig::default();
    let engine = BonusEngine::new(Classifier::default(), flat_calendar(), &cfg);
    let report = engine.run(&sheet, &mut UnclassifiedLedger::new()).unwrap();

    let june = &report.years[0].months[0];
    assert_eq!(june.totals.bonus_hours, 136.0);
    assert_eq!(june.totals.internal_hours, 8.0);
    assert_eq!(june.rtotal_required_hours, 144.0);
    assert_eq!(june.rtotal, RtotalOutcome::Missed { shortfall_hours: 8.0 });
    // Internal bonus time is not part of the Rlön pool.
    assert_eq!(june.rlon_hours, 0.0);
}
