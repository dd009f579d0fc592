//! Donation Models
//!
//! Typed view of the giving form and the per-request `DonationIntent`
//! built from it. Amounts use `rust_decimal` end to end; cents are only
//! produced at the Stripe boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

/// Giving form as submitted by the browser
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationForm {
    pub total_amount: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Raw `recurring` value (`one-time` or `monthly`)
    pub recurring: String,
    /// `fund[]` codes in submission order
    pub funds: Vec<String>,
    /// `fund_amount[]` values, positionally paired with `funds`
    pub fund_amounts: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl DonationForm {
    /// Build from urlencoded key/value pairs.
    ///
    /// Repeated `fund[]` and `fund_amount[]` keys keep their order. Required
    /// fields that are absent or blank fail here, before anything talks to
    /// Stripe.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut total_amount = None;
        let mut first_name = None;
        let mut last_name = None;
        let mut email = None;
        let mut recurring = None;
        let mut note = None;
        let mut funds = Vec::new();
        let mut fund_amounts = Vec::new();

        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "total_amount" => total_amount = Some(value),
                "firstName" => first_name = Some(value),
                "lastName" => last_name = Some(value),
                "email" => email = Some(value),
                "recurring" => recurring = Some(value),
                "note" => note = Some(value),
                "fund[]" => funds.push(value),
                "fund_amount[]" => fund_amounts.push(value),
                _ => {}
            }
        }

        Ok(Self {
            total_amount: required("total_amount", total_amount)?,
            first_name: required("firstName", first_name)?,
            last_name: required("lastName", last_name)?,
            email: required("email", email)?,
            recurring: required("recurring", recurring)?,
            funds,
            fund_amounts,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(PaymentError::missing(field)),
    }
}

/// Giving frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Monthly,
}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Monthly => "monthly",
        }
    }

    /// Only an exact `one-time` is a single gift; anything else recurs monthly.
    pub fn from_form(raw: &str) -> Self {
        if raw == "one-time" {
            Self::OneTime
        } else {
            Self::Monthly
        }
    }
}

/// Designated funds a gift can be split across
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fund {
    Tithes,
    Offering,
    Give3,
    SisterConnect,
    BrotherConnect,
    SinglesConnect,
    MarriageConnect,
    Other,
}

impl Fund {
    /// Unknown codes fall into `Other`
    pub fn from_code(code: &str) -> Self {
        match code {
            "tithes" => Self::Tithes,
            "offering" => Self::Offering,
            "give3" => Self::Give3,
            "sister-connect" => Self::SisterConnect,
            "brother-connect" => Self::BrotherConnect,
            "singles-connect" => Self::SinglesConnect,
            "marriage-connect" => Self::MarriageConnect,
            _ => Self::Other,
        }
    }

    /// Label shown on receipts and in the Stripe dashboard
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tithes => "Tithes",
            Self::Offering => "Offering",
            Self::Give3 => "Give 3 to BGP",
            Self::SisterConnect => "BGP Sister Connect",
            Self::BrotherConnect => "BGP Brother Connect",
            Self::SinglesConnect => "BGP Singles Connect",
            Self::MarriageConnect => "BGP Marriage Connect",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Fund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A positive amount designated to one fund
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub fund: Fund,
    pub amount: Decimal,
}

/// One donation, built per request and consumed by a single checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationIntent {
    /// Total in cents (truncated, always > 0)
    pub amount_cents: i64,

    /// Total as entered, for display
    pub total: Decimal,

    pub first_name: String,

    /// "First Last"
    pub donor_name: String,

    pub donor_email: String,

    pub note: Option<String>,

    pub frequency: Frequency,

    /// Positive allocations in submission order
    pub allocations: Vec<Allocation>,

    /// Day the gift was made
    pub date: NaiveDate,
}

impl DonationIntent {
    /// Validate a form and turn it into an intent
    pub fn from_form(form: DonationForm, date: NaiveDate) -> Result<Self> {
        let total = parse_amount("total_amount", &form.total_amount)?;
        let amount_cents = to_cents(total)?;
        if amount_cents <= 0 {
            return Err(PaymentError::invalid(
                "total_amount",
                "amount must be at least $0.01",
            ));
        }

        if form.funds.len() != form.fund_amounts.len() {
            tracing::warn!(
                funds = form.funds.len(),
                amounts = form.fund_amounts.len(),
                "Fund codes and amounts differ in length; extra entries ignored"
            );
        }

        let mut allocations = Vec::new();
        for (code, raw) in form.funds.iter().zip(&form.fund_amounts) {
            let amount = if raw.trim().is_empty() {
                Decimal::ZERO
            } else {
                parse_amount("fund_amount[]", raw)?
            };
            if amount > Decimal::ZERO {
                allocations.push(Allocation {
                    fund: Fund::from_code(code),
                    amount,
                });
            }
        }

        let intent = Self {
            amount_cents,
            total,
            donor_name: format!("{} {}", form.first_name, form.last_name),
            first_name: form.first_name,
            donor_email: form.email,
            note: form.note,
            frequency: Frequency::from_form(&form.recurring),
            allocations,
            date,
        };

        let allocated = intent.allocated_total()?;
        if !intent.allocations.is_empty() && allocated != intent.total {
            tracing::warn!(
                total = %intent.total,
                allocated = %allocated,
                "Fund allocations do not add up to the total"
            );
        }

        Ok(intent)
    }

    /// Sum of the positive allocations
    pub fn allocated_total(&self) -> Result<Decimal> {
        self.allocations
            .iter()
            .try_fold(Decimal::ZERO, |sum, a| sum.checked_add(a.amount))
            .ok_or_else(|| PaymentError::invalid("fund_amount[]", "amount is too large"))
    }

    /// Statement/receipt text
    pub fn description(&self) -> String {
        let mut description = format!("Offering from {}", self.donor_name);
        if !self.allocations.is_empty() {
            let funds: Vec<String> = self
                .allocations
                .iter()
                .map(|a| format!("{}: {}", a.fund, format_usd(a.amount)))
                .collect();
            description.push_str(" - Funds: ");
            description.push_str(&funds.join("; "));
        }
        if let Some(note) = &self.note {
            description.push_str(" - Note: ");
            description.push_str(note);
        }
        description
    }

    /// Tags attached to every Stripe object created for this gift
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("name".to_string(), self.donor_name.clone());
        metadata.insert("email".to_string(), self.donor_email.clone());
        metadata.insert("giving_type".to_string(), self.frequency.as_str().to_string());
        metadata.insert("total_amount".to_string(), format_usd(self.total));
        metadata.insert("date".to_string(), self.date.format("%Y-%m-%d").to_string());

        for (i, allocation) in self.allocations.iter().enumerate() {
            let n = i + 1;
            metadata.insert(format!("fund_{n}_name"), allocation.fund.label().to_string());
            metadata.insert(format!("fund_{n}_amount"), format_usd(allocation.amount));
        }

        if let Some(note) = &self.note {
            metadata.insert("note".to_string(), note.clone());
        }
        metadata
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('$').unwrap_or(raw);
    Decimal::from_str(raw).map_err(|_| PaymentError::invalid(field, format!("'{raw}' is not a valid amount")))
}

/// Dollars to cents, truncating fractions of a cent
pub fn to_cents(amount: Decimal) -> Result<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .ok_or_else(|| PaymentError::invalid("total_amount", "amount is too large"))
}

/// Two-decimal dollars, e.g. `$1234.50`
pub fn format_usd(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn form(recurring: &str, funds: &[(&str, &str)]) -> DonationForm {
        DonationForm {
            total_amount: "25.00".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            recurring: recurring.into(),
            funds: funds.iter().map(|(f, _)| f.to_string()).collect(),
            fund_amounts: funds.iter().map(|(_, a)| a.to_string()).collect(),
            note: None,
        }
    }

    #[test]
    fn test_from_pairs_keeps_fund_order() {
        let form = DonationForm::from_pairs([
            ("total_amount", "10.00"),
            ("firstName", "Jane"),
            ("lastName", "Doe"),
            ("email", "jane@example.com"),
            ("recurring", "monthly"),
            ("fund[]", "offering"),
            ("fund_amount[]", "5.00"),
            ("fund[]", "other"),
            ("fund_amount[]", "5.00"),
            ("note", "   "),
        ])
        .unwrap();

        assert_eq!(form.funds, vec!["offering", "other"]);
        assert_eq!(form.fund_amounts, vec!["5.00", "5.00"]);
        assert_eq!(form.note, None);
    }

    #[test]
    fn test_from_pairs_missing_email() {
        let err = DonationForm::from_pairs([
            ("total_amount", "10.00"),
            ("firstName", "Jane"),
            ("lastName", "Doe"),
            ("recurring", "one-time"),
        ])
        .unwrap_err();

        assert_eq!(err, PaymentError::missing("email"));
    }

    #[test]
    fn test_from_pairs_blank_required_field() {
        let err = DonationForm::from_pairs([
            ("total_amount", "10.00"),
            ("firstName", " "),
            ("lastName", "Doe"),
            ("email", "jane@example.com"),
            ("recurring", "one-time"),
        ])
        .unwrap_err();

        assert_eq!(err, PaymentError::missing("firstName"));
    }

    #[test]
    fn test_cents_truncate() {
        assert_eq!(to_cents(dec!(12.34)).unwrap(), 1234);
        assert_eq!(to_cents(dec!(0.005)).unwrap(), 0);
        assert_eq!(to_cents(dec!(19.999)).unwrap(), 1999);
    }

    #[test]
    fn test_sub_cent_total_rejected() {
        let mut f = form("one-time", &[]);
        f.total_amount = "0.005".into();
        let err = DonationIntent::from_form(f, today()).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidInput { ref field, .. } if field == "total_amount"));
    }

    #[test]
    fn test_non_numeric_total_rejected() {
        let mut f = form("one-time", &[]);
        f.total_amount = "twenty".into();
        assert!(DonationIntent::from_form(f, today()).unwrap_err().is_input_error());
    }

    #[test]
    fn test_one_time_description() {
        let intent = DonationIntent::from_form(form("one-time", &[("tithes", "25.00")]), today()).unwrap();

        assert_eq!(intent.amount_cents, 2500);
        assert_eq!(intent.frequency, Frequency::OneTime);
        assert_eq!(intent.description(), "Offering from Jane Doe - Funds: Tithes: $25.00");
    }

    #[test]
    fn test_description_without_funds_and_with_note() {
        let mut f = form("one-time", &[("tithes", "0")]);
        f.note = Some("In memory of Grandma".into());
        let intent = DonationIntent::from_form(f, today()).unwrap();

        assert_eq!(
            intent.description(),
            "Offering from Jane Doe - Note: In memory of Grandma"
        );
        assert_eq!(intent.metadata()["note"], "In memory of Grandma");
    }

    #[test]
    fn test_metadata_numbering_skips_non_positive() {
        let mut f = form(
            "monthly",
            &[("tithes", "0"), ("offering", "5.00"), ("give3", "-2"), ("other", "5")],
        );
        f.total_amount = "10.00".into();
        let intent = DonationIntent::from_form(f, today()).unwrap();
        let metadata = intent.metadata();

        assert_eq!(metadata["fund_1_name"], "Offering");
        assert_eq!(metadata["fund_1_amount"], "$5.00");
        assert_eq!(metadata["fund_2_name"], "Other");
        assert_eq!(metadata["fund_2_amount"], "$5.00");
        assert!(!metadata.contains_key("fund_3_name"));
        assert!(!metadata.values().any(|v| v == "Tithes" || v == "Give 3 to BGP"));
        assert!(!intent.description().contains("Tithes"));
    }

    #[test]
    fn test_metadata_core_fields() {
        let intent = DonationIntent::from_form(form("monthly", &[]), today()).unwrap();
        let metadata = intent.metadata();

        assert_eq!(metadata["name"], "Jane Doe");
        assert_eq!(metadata["email"], "jane@example.com");
        assert_eq!(metadata["giving_type"], "monthly");
        assert_eq!(metadata["total_amount"], "$25.00");
        assert_eq!(metadata["date"], "2026-10-19");
        assert!(!metadata.contains_key("note"));
    }

    #[test]
    fn test_unknown_fund_is_other() {
        let intent =
            DonationIntent::from_form(form("one-time", &[("building-fund", "25")]), today()).unwrap();

        assert_eq!(intent.allocations[0].fund, Fund::Other);
        assert_eq!(intent.metadata()["fund_1_name"], "Other");
        assert!(intent.description().ends_with("Other: $25.00"));
    }

    #[test]
    fn test_anything_but_one_time_is_monthly() {
        assert_eq!(Frequency::from_form("one-time"), Frequency::OneTime);
        assert_eq!(Frequency::from_form("monthly"), Frequency::Monthly);
        assert_eq!(Frequency::from_form("One-Time"), Frequency::Monthly);
    }

    #[test]
    fn test_blank_fund_amount_skipped_bad_amount_rejected() {
        let intent =
            DonationIntent::from_form(form("one-time", &[("tithes", ""), ("offering", "25")]), today())
                .unwrap();
        assert_eq!(intent.allocations.len(), 1);

        let err = DonationIntent::from_form(form("one-time", &[("tithes", "abc")]), today()).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidInput { ref field, .. } if field == "fund_amount[]"));
    }

    #[test]
    fn test_mismatched_allocations_are_permitted() {
        let intent =
            DonationIntent::from_form(form("one-time", &[("tithes", "10.00")]), today()).unwrap();
        assert_eq!(intent.amount_cents, 2500);
        assert_eq!(intent.allocated_total().unwrap(), dec!(10.00));
    }

    #[test]
    fn test_huge_total_rejected() {
        let mut f = form("one-time", &[]);
        f.total_amount = Decimal::MAX.to_string();
        let err = DonationIntent::from_form(f, today()).unwrap_err();

        assert_eq!(err, PaymentError::invalid("total_amount", "amount is too large"));
    }

    #[test]
    fn test_huge_fund_amounts_rejected() {
        let max = Decimal::MAX.to_string();
        let err = DonationIntent::from_form(
            form("one-time", &[("tithes", max.as_str()), ("offering", max.as_str())]),
            today(),
        )
        .unwrap_err();

        assert_eq!(err, PaymentError::invalid("fund_amount[]", "amount is too large"));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(25)), "$25.00");
        assert_eq!(format_usd(dec!(5.5)), "$5.50");
        assert_eq!(format_usd(dec!(1.005)), "$1.01");
    }
}
