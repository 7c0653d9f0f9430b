use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const MAX_DRIVE_HOURS: Decimal = dec!(11.0);
pub const MAX_ON_DUTY_HOURS: Decimal = dec!(14.0);
pub const REQUIRED_BREAK_AFTER: Decimal = dec!(8.0);

const DRIVE_WARNING_SHARE: Decimal = dec!(0.9);
const ON_DUTY_WARNING_SHARE: Decimal = dec!(0.9);
const BREAK_WARNING_SHARE: Decimal = dec!(0.8);

/// Hours logged so far in the driver's day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HosHours {
    pub drive_hours_today: Decimal,
    pub on_duty_hours_today: Decimal,
    /// `None` when no break has been recorded.
    pub hours_since_break: Option<Decimal>,
}

/// Remaining budgets and findings for a day of driving.
///
/// The ceilings are the simplified 11/14/8 hour rules, not the full federal
/// rule set (no 60/70 hour cycles, no sleeper-berth splits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HosEvaluation {
    pub hours_available_to_drive: Decimal,
    pub hours_available_on_duty: Decimal,
    pub hours_until_required_break: Decimal,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
}

impl HosEvaluation {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty() && self.warnings.is_empty()
    }
}

pub fn evaluate(hours: &HosHours) -> HosEvaluation {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    let drive_remaining = MAX_DRIVE_HOURS - hours.drive_hours_today;
    if hours.drive_hours_today >= MAX_DRIVE_HOURS {
        violations.push(format!(
            "Maximum driving hours ({MAX_DRIVE_HOURS}h) exceeded"
        ));
    } else if hours.drive_hours_today >= MAX_DRIVE_HOURS * DRIVE_WARNING_SHARE {
        warnings.push(format!(
            "Approaching maximum driving hours ({:.1}h remaining)",
            drive_remaining
        ));
    }

    let on_duty_remaining = MAX_ON_DUTY_HOURS - hours.on_duty_hours_today;
    if hours.on_duty_hours_today >= MAX_ON_DUTY_HOURS {
        violations.push(format!(
            "Maximum on-duty hours ({MAX_ON_DUTY_HOURS}h) exceeded"
        ));
    } else if hours.on_duty_hours_today >= MAX_ON_DUTY_HOURS * ON_DUTY_WARNING_SHARE {
        warnings.push("Approaching maximum on-duty hours".to_string());
    }

    let mut break_remaining = REQUIRED_BREAK_AFTER;
    if let Some(since_break) = hours.hours_since_break {
        break_remaining = REQUIRED_BREAK_AFTER - since_break;
        if since_break >= REQUIRED_BREAK_AFTER {
            violations.push(format!(
                "Required 30-minute break after {REQUIRED_BREAK_AFTER}h not taken"
            ));
        } else if since_break >= REQUIRED_BREAK_AFTER * BREAK_WARNING_SHARE {
            warnings.push(format!("Break required soon ({:.1}h)", break_remaining));
        }
    }

    HosEvaluation {
        hours_available_to_drive: drive_remaining.max(Decimal::ZERO),
        hours_available_on_duty: on_duty_remaining.max(Decimal::ZERO),
        hours_until_required_break: break_remaining.max(Decimal::ZERO),
        violations,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(drive: Decimal, on_duty: Decimal, since_break: Option<Decimal>) -> HosHours {
        HosHours {
            drive_hours_today: drive,
            on_duty_hours_today: on_duty,
            hours_since_break: since_break,
        }
    }

    #[test]
    fn reaching_the_drive_ceiling_is_a_violation() {
        let evaluation = evaluate(&hours(dec!(11.0), dec!(11.0), None));
        assert_eq!(evaluation.violations.len(), 1);
        assert!(evaluation.violations[0].contains("Maximum driving hours"));
        assert_eq!(evaluation.hours_available_to_drive, Decimal::ZERO);
    }

    #[test]
    fn ninety_percent_of_drive_ceiling_warns_without_violation() {
        let evaluation = evaluate(&hours(dec!(9.9), dec!(9.9), None));
        assert!(evaluation.violations.is_empty());
        assert_eq!(
            evaluation.warnings,
            vec!["Approaching maximum driving hours (1.1h remaining)".to_string()]
        );
    }

    #[test]
    fn light_day_has_no_findings() {
        let evaluation = evaluate(&hours(dec!(5.0), dec!(6.0), Some(dec!(2.0))));
        assert!(evaluation.is_compliant());
        assert_eq!(evaluation.hours_available_to_drive, dec!(6.0));
        assert_eq!(evaluation.hours_available_on_duty, dec!(8.0));
        assert_eq!(evaluation.hours_until_required_break, dec!(6.0));
    }

    #[test]
    fn on_duty_thresholds() {
        let warning = evaluate(&hours(dec!(5), dec!(12.6), None));
        assert_eq!(warning.warnings, vec!["Approaching maximum on-duty hours"]);

        let violation = evaluate(&hours(dec!(5), dec!(14.5), None));
        assert!(violation.violations[0].contains("on-duty"));
        assert_eq!(violation.hours_available_on_duty, Decimal::ZERO);
    }

    #[test]
    fn break_uses_eighty_percent_warning_share() {
        let warning = evaluate(&hours(dec!(3), dec!(4), Some(dec!(6.4))));
        assert_eq!(warning.warnings, vec!["Break required soon (1.6h)"]);

        let violation = evaluate(&hours(dec!(3), dec!(4), Some(dec!(9))));
        assert!(violation.violations[0].contains("30-minute break"));
        assert_eq!(violation.hours_until_required_break, Decimal::ZERO);
    }

    #[test]
    fn unknown_break_defaults_to_full_interval() {
        let evaluation = evaluate(&hours(dec!(1), dec!(1), None));
        assert_eq!(evaluation.hours_until_required_break, REQUIRED_BREAK_AFTER);
    }

    #[test]
    fn all_ceilings_breached_together() {
        let evaluation = evaluate(&hours(dec!(12), dec!(15), Some(dec!(10))));
        assert_eq!(evaluation.violations.len(), 3);
        assert!(evaluation.warnings.is_empty());
    }
}
