//! Plain-text rendering of reports.

use bonusmodel_core::{
    MonthVerdict, Report, UnclassifiedGroup, YearReport, summarize_lines,
};
use std::fmt::Write;

pub fn render_month(out: &mut String, m: &MonthVerdict) {
    let _ = writeln!(out, "{}-{:02}  -  Hours for month: {:.0}h", m.year, m.month, m.required_hours);
    let _ = writeln!(out, "  Hour thresholds:");
    let _ = writeln!(out, "    Rtotal: {:.1}", m.rtotal_required_hours);
    let _ = writeln!(out, "    Rlinear: {:.1}", m.rlinear_threshold);
    let _ = writeln!(out, "    Rlön: {:.1}", m.rlon_threshold);
    let _ = writeln!(out, "  Rtotal: {}", m.rtotal);
    let _ = writeln!(out, "  Rtotal hour bank={:.1}h", m.bank_balance);
    let _ = writeln!(out, "  Received Rlinear={:.1}h", m.rlinear_hours);
    let _ = writeln!(out, "  Received Rlön={:.1}h", m.rlon_hours);
    if m.totals.unclassified_hours > 0.0 {
        let _ = writeln!(out, "  Unclassified={:.1}h", m.totals.unclassified_hours);
    }
    let _ = writeln!(out);

    let lines = summarize_lines(m);
    if !lines.is_empty() {
        let _ = writeln!(out, "  Monthly time sheet lines with hours combined:");
        for l in lines {
            let _ = writeln!(
                out,
                "    job={}, activity={}, task={}, hours={:.1}, type={}",
                l.job, l.activity, l.task, l.hours, l.label
            );
        }
        let _ = writeln!(out);
    }
}

pub fn render_monthly(report: &Report) -> String {
    let mut out = String::new();
    for year in &report.years {
        for m in &year.months {
            render_month(&mut out, m);
        }
        let _ = writeln!(out, "  {}", year.verdict.narrative());
        let _ = writeln!(out);
    }
    out
}

fn render_year(out: &mut String, y: &YearReport, report: &Report) {
    let v = &y.verdict;
    let rates = &report.rates;
    let _ = writeln!(out, "-- {} --", v.year);
    let _ = writeln!(out, "  Rtotal payments: {:.1}st", v.rtotal_count);
    let _ = writeln!(out, "  Rlinear hours:   {:.1}h", v.rlinear_hours);
    let _ = writeln!(out, "  Rlön hours:      {:.1}h", v.rlon_hours);
    if v.hours_lost != 0.0 {
        let _ = writeln!(out, "  Previous Rtotal hours lost: {:.1}h", v.hours_lost);
    }
    let _ = writeln!(out, "  {}", v.narrative());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Total current: {:.1}*{} + {:.1}*{}=",
        v.rtotal_count, rates.rtotal, v.rlinear_hours, rates.rlinear
    );
    let _ = writeln!(out, "                 {:.0} kr", y.payout.current);
    let _ = writeln!(out, "  Total new:     {:.1}*{}=", v.rlon_hours, rates.rlon);
    let _ = writeln!(out, "                 {:.0} kr", y.payout.proposed);
    let _ = writeln!(out, "  Difference:    {:+.0} kr", y.payout.difference());
    let _ = writeln!(out);
}

pub fn render_yearly(report: &Report) -> String {
    let mut out = String::new();
    for y in &report.years {
        render_year(&mut out, y, report);
    }
    if report.years.len() > 1 {
        let total = report.total_payout();
        let _ = writeln!(
            out,
            "All years: current {:.0} kr, new {:.0} kr ({:+.0} kr)",
            total.current,
            total.proposed,
            total.difference()
        );
    }
    out
}

pub fn render_unclassified(groups: &[UnclassifiedGroup]) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(out, "No unclassified time sheet lines.");
        return out;
    }
    for g in groups {
        let _ = writeln!(out, "{} - {:6.1}h - {}", g.job, g.hours, g.job_name);
        let _ = writeln!(out, "  Activity: {}", g.activity);
        let _ = writeln!(out, "  Description: {}", g.description);
        if !g.tasks.is_empty() {
            let _ = writeln!(out, "  Tasks: {}", g.tasks.join(", "));
        }
        if let Some(cat) = g.suggested {
            let _ = writeln!(out, "  Suggested: {cat}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonusmodel_core::{
        BonusConfig, BonusEngine, Category, Classify, FixedCalendar, TimeEntry, Timesheet,
        UnclassifiedLedger,
    };
    use chrono::NaiveDate;

    struct ByJob;

    impl Classify for ByJob {
        fn classify(&self, entry: &TimeEntry) -> Category {
            entry.job.parse().unwrap_or(Category::Unclassified)
        }
    }

    fn report() -> (Report, Vec<UnclassifiedGroup>) {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let sheet = Timesheet::from_entries(vec![
            TimeEntry::new(d(4), 160.0, "billable", "10", "Dev"),
            TimeEntry::new(d(5), 8.0, "vacation", "1", "Semester"),
            TimeEntry::new(d(6), 2.0, "K-1", "3", "Workshop").with_job_name("Kund AB"),
        ])
        .unwrap();
        let cfg = BonusConfig::default();
        let engine = BonusEngine::new(ByJob, FixedCalendar::new().with_year(2024, [168; 12]), &cfg);
        let mut ledger = UnclassifiedLedger::new();
        let report = engine.run(&sheet, &mut ledger).unwrap();
        (report, ledger.finalize())
    }

    #[test]
    fn test_monthly_lists_combined_lines() {
        let (report, _) = report();
        let text = render_monthly(&report);
        assert!(text.contains("2024-03  -  Hours for month: 168h"));
        assert!(text.contains("Received Rlön=38.0h"));
        assert!(text.contains("job=vacation, activity=1, task=Semester, hours=8.0, type=vacation, bonus-eligible"));
        assert!(text.contains("Unclassified=2.0h"));
    }

    #[test]
    fn test_yearly_shows_payouts() {
        let (report, _) = report();
        let text = render_yearly(&report);
        assert!(text.contains("-- 2024 --"));
        assert!(text.contains("Rtotal payments: 1.0st"));
        // 1 * 2000 + 30 * 40
        assert!(text.contains("3200 kr"));
        // 38 * 93
        assert!(text.contains("3534 kr"));
    }

    #[test]
    fn test_unclassified_listing() {
        let (_, groups) = report();
        let text = render_unclassified(&groups);
        assert!(text.starts_with("K-1 -    2.0h - Kund AB"));
        assert!(render_unclassified(&[]).contains("No unclassified"));
    }
}
