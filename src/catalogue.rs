//! The fixed table of simulation actions exposed by the backend.
//!
//! [`ActionKind`] names the triggerable entries (one per button in the
//! console); [`ActionKind::bind`] turns one into a parameterized [`Action`]
//! using the current form values, and [`Action::request`] describes the HTTP
//! call it maps to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::client::{ActionRequest, Method};
use crate::view::FormFields;

/// Largest integer an IEEE double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Unknown name passed where a catalogue value was expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

/// Generator machine model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymType {
    Standard,
    #[default]
    Classical,
}

impl SymType {
    pub const ALL: [SymType; 2] = [SymType::Standard, SymType::Classical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Classical => "classical",
        }
    }

    /// The other model.
    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Classical,
            Self::Classical => Self::Standard,
        }
    }
}

impl fmt::Display for SymType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "sym type",
                value: s.to_string(),
            })
    }
}

/// Protection relay categories that accept an item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relay {
    Overcurrent,
    /// Under-frequency load shedding (UFLS).
    UnderFrequencyLoadShedding,
    /// Over-frequency generator tripping (OFGT).
    OverFrequencyGeneratorTripping,
    /// Under-frequency generator tripping (UFGT).
    UnderFrequencyGeneratorTripping,
}

impl Relay {
    pub const ALL: [Relay; 4] = [
        Relay::Overcurrent,
        Relay::UnderFrequencyLoadShedding,
        Relay::OverFrequencyGeneratorTripping,
        Relay::UnderFrequencyGeneratorTripping,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Overcurrent => "/overcurrent-relay",
            Self::UnderFrequencyLoadShedding => "/under-frequency-load-shedding",
            Self::OverFrequencyGeneratorTripping => "/over-frequency-generator-tripping",
            Self::UnderFrequencyGeneratorTripping => "/under-frequency-generator-tripping",
        }
    }

    /// Catalogue entries that add and remove this relay, in that order.
    pub fn kinds(self) -> (ActionKind, ActionKind) {
        match self {
            Self::Overcurrent => (
                ActionKind::AddOvercurrentRelay,
                ActionKind::RemoveOvercurrentRelay,
            ),
            Self::UnderFrequencyLoadShedding => (ActionKind::AddUfls, ActionKind::RemoveUfls),
            Self::OverFrequencyGeneratorTripping => (ActionKind::AddOfgt, ActionKind::RemoveOfgt),
            Self::UnderFrequencyGeneratorTripping => (ActionKind::AddUfgt, ActionKind::RemoveUfgt),
        }
    }
}

/// A catalogue entry with its parameters filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SymType(SymType),
    LoadType,
    DisableAvr,
    AddRelay {
        relay: Relay,
        items: Option<Vec<String>>,
    },
    RemoveRelay {
        relay: Relay,
        items: Option<Vec<String>>,
    },
    GeneratorControl,
    LoadingLevel(f64),
    InitialGenerationLevel(f64),
    LineRating,
    RandomCases(f64),
    RunN2Contingencies,
    Matching,
    Simulation,
}

impl Action {
    pub fn method(&self) -> Method {
        match self {
            Self::Simulation => Method::Get,
            Self::RemoveRelay { .. } => Method::Delete,
            _ => Method::Post,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::SymType(_) => "/sym-type",
            Self::LoadType => "/load-type",
            Self::DisableAvr => "/disable-avr",
            Self::AddRelay { relay, .. } | Self::RemoveRelay { relay, .. } => relay.path(),
            Self::GeneratorControl => "/generator-control",
            Self::LoadingLevel(_) => "/loading-level",
            Self::InitialGenerationLevel(_) => "/initial-generation-level",
            Self::LineRating => "/line-rating",
            Self::RandomCases(_) => "/random-cases",
            Self::RunN2Contingencies => "/run-n2-contingencies",
            Self::Matching => "/matching",
            Self::Simulation => "/simulation",
        }
    }

    /// JSON body, or `None` for entries that send no body.
    ///
    /// An absent item list is sent as `"items": null`, never omitted.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::SymType(t) => Some(json!({ "type": t.as_str() })),
            Self::AddRelay { items, .. } | Self::RemoveRelay { items, .. } => {
                Some(json!({ "items": items }))
            }
            Self::LoadingLevel(x) | Self::InitialGenerationLevel(x) => {
                Some(json!({ "loading": json_number(*x) }))
            }
            Self::RandomCases(n) => Some(json!({ "num": json_number(*n) })),
            Self::LoadType
            | Self::DisableAvr
            | Self::GeneratorControl
            | Self::LineRating
            | Self::RunN2Contingencies
            | Self::Matching
            | Self::Simulation => None,
        }
    }

    pub fn request(&self) -> ActionRequest {
        let request = ActionRequest::new(self.method(), self.path());
        match self.body() {
            Some(body) => request.with_body(body),
            None => request,
        }
    }
}

/// Console section an entry is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Generator,
    Relays,
    LoadAndGeneration,
    LineAndSimulation,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Generator,
        Section::Relays,
        Section::LoadAndGeneration,
        Section::LineAndSimulation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Generator => "Generator",
            Self::Relays => "Relays",
            Self::LoadAndGeneration => "Load & generation",
            Self::LineAndSimulation => "Line & simulation",
        }
    }
}

/// One triggerable catalogue entry, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SymType,
    DisableAvr,
    GeneratorControl,
    AddOvercurrentRelay,
    RemoveOvercurrentRelay,
    AddUfls,
    RemoveUfls,
    AddOfgt,
    RemoveOfgt,
    AddUfgt,
    RemoveUfgt,
    LoadType,
    LoadingLevel,
    InitialGenerationLevel,
    LineRating,
    RandomCases,
    RunN2Contingencies,
    Matching,
    Simulation,
}

impl ActionKind {
    /// Every entry in console order (grouped by [`Section`]).
    pub const ALL: [ActionKind; 19] = [
        ActionKind::SymType,
        ActionKind::DisableAvr,
        ActionKind::GeneratorControl,
        ActionKind::AddOvercurrentRelay,
        ActionKind::RemoveOvercurrentRelay,
        ActionKind::AddUfls,
        ActionKind::RemoveUfls,
        ActionKind::AddOfgt,
        ActionKind::RemoveOfgt,
        ActionKind::AddUfgt,
        ActionKind::RemoveUfgt,
        ActionKind::LoadType,
        ActionKind::LoadingLevel,
        ActionKind::InitialGenerationLevel,
        ActionKind::LineRating,
        ActionKind::RandomCases,
        ActionKind::RunN2Contingencies,
        ActionKind::Matching,
        ActionKind::Simulation,
    ];

    /// Stable kebab-case identifier used on the command line and in stub replies.
    pub fn id(self) -> &'static str {
        match self {
            Self::SymType => "sym-type",
            Self::DisableAvr => "disable-avr",
            Self::GeneratorControl => "generator-control",
            Self::AddOvercurrentRelay => "add-overcurrent-relay",
            Self::RemoveOvercurrentRelay => "remove-overcurrent-relay",
            Self::AddUfls => "add-ufls",
            Self::RemoveUfls => "remove-ufls",
            Self::AddOfgt => "add-ofgt",
            Self::RemoveOfgt => "remove-ofgt",
            Self::AddUfgt => "add-ufgt",
            Self::RemoveUfgt => "remove-ufgt",
            Self::LoadType => "load-type",
            Self::LoadingLevel => "loading-level",
            Self::InitialGenerationLevel => "initial-generation-level",
            Self::LineRating => "line-rating",
            Self::RandomCases => "random-cases",
            Self::RunN2Contingencies => "run-n2-contingencies",
            Self::Matching => "matching",
            Self::Simulation => "simulation",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::SymType => "Change sym type",
            Self::DisableAvr => "Disable AVR",
            Self::GeneratorControl => "Set up generator control",
            Self::AddOvercurrentRelay => "Add overcurrent relay",
            Self::RemoveOvercurrentRelay => "Remove overcurrent relay",
            Self::AddUfls => "Add UFLS",
            Self::RemoveUfls => "Remove UFLS",
            Self::AddOfgt => "Add OFGT",
            Self::RemoveOfgt => "Remove OFGT",
            Self::AddUfgt => "Add UFGT",
            Self::RemoveUfgt => "Remove UFGT",
            Self::LoadType => "Change load type",
            Self::LoadingLevel => "Set loading level",
            Self::InitialGenerationLevel => "Set initial generation level",
            Self::LineRating => "Change line rating",
            Self::RandomCases => "Generate random cases",
            Self::RunN2Contingencies => "Run N-2 contingencies",
            Self::Matching => "Matching",
            Self::Simulation => "Simulation",
        }
    }

    pub fn section(self) -> Section {
        match self {
            Self::SymType | Self::DisableAvr | Self::GeneratorControl => Section::Generator,
            Self::AddOvercurrentRelay
            | Self::RemoveOvercurrentRelay
            | Self::AddUfls
            | Self::RemoveUfls
            | Self::AddOfgt
            | Self::RemoveOfgt
            | Self::AddUfgt
            | Self::RemoveUfgt => Section::Relays,
            Self::LoadType | Self::LoadingLevel | Self::InitialGenerationLevel => {
                Section::LoadAndGeneration
            }
            Self::LineRating
            | Self::RandomCases
            | Self::RunN2Contingencies
            | Self::Matching
            | Self::Simulation => Section::LineAndSimulation,
        }
    }

    /// Relay targeted by an add/remove entry, with `true` for add.
    pub fn relay(self) -> Option<(Relay, bool)> {
        match self {
            Self::AddOvercurrentRelay => Some((Relay::Overcurrent, true)),
            Self::RemoveOvercurrentRelay => Some((Relay::Overcurrent, false)),
            Self::AddUfls => Some((Relay::UnderFrequencyLoadShedding, true)),
            Self::RemoveUfls => Some((Relay::UnderFrequencyLoadShedding, false)),
            Self::AddOfgt => Some((Relay::OverFrequencyGeneratorTripping, true)),
            Self::RemoveOfgt => Some((Relay::OverFrequencyGeneratorTripping, false)),
            Self::AddUfgt => Some((Relay::UnderFrequencyGeneratorTripping, true)),
            Self::RemoveUfgt => Some((Relay::UnderFrequencyGeneratorTripping, false)),
            _ => None,
        }
    }

    /// Builds the parameterized action from the current form values.
    ///
    /// Numeric fields are coerced at call time with [`coerce_number`];
    /// nothing is rejected.
    pub fn bind(self, form: &FormFields) -> Action {
        let add = |relay| Action::AddRelay {
            relay,
            items: parse_items(&form.items),
        };
        let remove = |relay| Action::RemoveRelay {
            relay,
            items: parse_items(&form.items),
        };
        match self {
            Self::SymType => Action::SymType(form.sym_type),
            Self::DisableAvr => Action::DisableAvr,
            Self::GeneratorControl => Action::GeneratorControl,
            Self::AddOvercurrentRelay => add(Relay::Overcurrent),
            Self::RemoveOvercurrentRelay => remove(Relay::Overcurrent),
            Self::AddUfls => add(Relay::UnderFrequencyLoadShedding),
            Self::RemoveUfls => remove(Relay::UnderFrequencyLoadShedding),
            Self::AddOfgt => add(Relay::OverFrequencyGeneratorTripping),
            Self::RemoveOfgt => remove(Relay::OverFrequencyGeneratorTripping),
            Self::AddUfgt => add(Relay::UnderFrequencyGeneratorTripping),
            Self::RemoveUfgt => remove(Relay::UnderFrequencyGeneratorTripping),
            Self::LoadType => Action::LoadType,
            Self::LoadingLevel => Action::LoadingLevel(coerce_number(&form.loading_level)),
            Self::InitialGenerationLevel => {
                Action::InitialGenerationLevel(coerce_number(&form.loading_level))
            }
            Self::LineRating => Action::LineRating,
            Self::RandomCases => Action::RandomCases(coerce_number(&form.random_cases)),
            Self::RunN2Contingencies => Action::RunN2Contingencies,
            Self::Matching => Action::Matching,
            Self::Simulation => Action::Simulation,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ActionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| ParseError {
                kind: "action",
                value: s.to_string(),
            })
    }
}

/// Splits the free-text item field.
///
/// Blank input gives `None`; otherwise tokens separated by runs of
/// whitespace and commas, empty tokens dropped, order kept.
pub fn parse_items(text: &str) -> Option<Vec<String>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(
        text.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Loose numeric coercion of a form field.
///
/// Surrounding whitespace is ignored and blank text is `0`. Accepts decimal
/// and exponent forms, `0x`/`0o`/`0b` integer literals and `Infinity`;
/// everything else is NaN.
pub fn coerce_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let rest = s
            .strip_prefix(prefix)
            .or_else(|| s.strip_prefix(&prefix.to_uppercase()));
        if let Some(digits) = rest {
            return parse_radix(digits, radix).unwrap_or(f64::NAN);
        }
    }

    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // f64::from_str also takes "inf" and "nan", which are not numbers here.
    let decimal_start = unsigned
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.');
    let decimal_chars = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal_start || !decimal_chars {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// JSON encoding of a coerced number.
///
/// Non-finite values become `null`; integral values within the exact
/// integer range are written without a fraction (`50`, not `50.0`).
pub fn json_number(x: f64) -> Value {
    if !x.is_finite() {
        return Value::Null;
    }
    if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER {
        return Value::from(x as i64);
    }
    Value::from(x)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn form() -> FormFields {
        FormFields::default()
    }

    #[test]
    fn parameterless_entries_send_no_body() {
        let expected = [
            (ActionKind::LoadType, Method::Post, "/load-type"),
            (ActionKind::DisableAvr, Method::Post, "/disable-avr"),
            (ActionKind::GeneratorControl, Method::Post, "/generator-control"),
            (ActionKind::LineRating, Method::Post, "/line-rating"),
            (ActionKind::RunN2Contingencies, Method::Post, "/run-n2-contingencies"),
            (ActionKind::Matching, Method::Post, "/matching"),
            (ActionKind::Simulation, Method::Get, "/simulation"),
        ];
        for (kind, method, path) in expected {
            let request = kind.bind(&form()).request();
            assert_eq!(request.method, method, "{kind}");
            assert_eq!(request.path, path, "{kind}");
            assert!(request.body.is_none(), "{kind} should have no body");
        }
    }

    #[test]
    fn relay_entries_use_post_and_delete_on_shared_path() {
        for relay in Relay::ALL {
            let (add, remove) = relay.kinds();
            let add_req = add.bind(&form()).request();
            let remove_req = remove.bind(&form()).request();
            assert_eq!(add_req.method, Method::Post);
            assert_eq!(remove_req.method, Method::Delete);
            assert_eq!(add_req.path, relay.path());
            assert_eq!(remove_req.path, relay.path());
            assert_eq!(add.relay(), Some((relay, true)));
            assert_eq!(remove.relay(), Some((relay, false)));
        }
    }

    #[test]
    fn blank_items_are_sent_as_null() {
        let mut f = form();
        f.items = "  \t ".to_string();
        let request = ActionKind::AddUfls.bind(&f).request();
        assert_eq!(request.body, Some(json!({ "items": null })));
    }

    #[test]
    fn items_are_split_on_commas_and_whitespace() {
        let mut f = form();
        f.items = " G1, G2,,G3\n  Load 7 ".to_string();
        let request = ActionKind::RemoveOfgt.bind(&f).request();
        assert_eq!(
            request.body,
            Some(json!({ "items": ["G1", "G2", "G3", "Load", "7"] }))
        );
    }

    #[test]
    fn sym_type_body_uses_form_value() {
        let mut f = form();
        assert_eq!(
            ActionKind::SymType.bind(&f).body(),
            Some(json!({ "type": "classical" }))
        );
        f.sym_type = SymType::Standard;
        assert_eq!(
            ActionKind::SymType.bind(&f).request().body,
            Some(json!({ "type": "standard" }))
        );
    }

    #[test]
    fn loading_level_is_coerced_to_number() {
        let mut f = form();
        f.loading_level = "2.5".to_string();
        let request = ActionKind::LoadingLevel.bind(&f).request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/loading-level");
        assert_eq!(request.body, Some(json!({ "loading": 2.5 })));

        let request = ActionKind::InitialGenerationLevel.bind(&f).request();
        assert_eq!(request.path, "/initial-generation-level");
        assert_eq!(request.body, Some(json!({ "loading": 2.5 })));
    }

    #[test]
    fn random_cases_sends_integer() {
        let mut f = form();
        f.random_cases = "50".to_string();
        let request = ActionKind::RandomCases.bind(&f).request();
        assert_eq!(request.path, "/random-cases");
        assert_eq!(request.body, Some(json!({ "num": 50 })));
        assert_eq!(serde_json::to_string(&request.body).unwrap(), r#"{"num":50}"#);
    }

    #[test]
    fn default_form_values() {
        let f = form();
        assert_eq!(
            ActionKind::LoadingLevel.bind(&f).body(),
            Some(json!({ "loading": 1 }))
        );
        assert_eq!(
            ActionKind::RandomCases.bind(&f).body(),
            Some(json!({ "num": 100 }))
        );
    }

    #[test]
    fn garbage_numbers_are_not_rejected() {
        let mut f = form();
        f.random_cases = "lots".to_string();
        assert_eq!(
            ActionKind::RandomCases.bind(&f).body(),
            Some(json!({ "num": null }))
        );
    }

    #[test]
    fn coerce_number_cases() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number("+5"), 5.0);
        assert_eq!(coerce_number("-1e3"), -1000.0);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("5."), 5.0);
        assert_eq!(coerce_number("0x1F"), 31.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert_eq!(coerce_number("0O17"), 15.0);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        for bad in ["abc", "inf", "NaN", "1,5", "0x", "0xZZ", "--1", "1e", "."] {
            assert!(coerce_number(bad).is_nan(), "{bad:?} should be NaN");
        }
    }

    #[test]
    fn json_number_encoding() {
        assert_eq!(json_number(50.0), json!(50));
        assert_eq!(json_number(-0.0), json!(0));
        assert_eq!(json_number(2.5), json!(2.5));
        assert_eq!(json_number(f64::NAN), Value::Null);
        assert_eq!(json_number(f64::INFINITY), Value::Null);
        assert_eq!(json_number(1e300), json!(1e300));
    }

    #[test]
    fn ids_are_unique_and_round_trip() {
        let ids: HashSet<_> = ActionKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), ActionKind::ALL.len());
        for kind in ActionKind::ALL {
            assert_eq!(kind.id().parse::<ActionKind>(), Ok(kind));
        }
        let err = "warp-drive".parse::<ActionKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown action \"warp-drive\"");
    }

    #[test]
    fn all_is_grouped_by_section() {
        let mut seen = Vec::new();
        for kind in ActionKind::ALL {
            let section = kind.section();
            if seen.last() != Some(&section) {
                assert!(!seen.contains(&section), "{section:?} is split");
                seen.push(section);
            }
        }
        assert_eq!(seen, Section::ALL);
    }

    #[test]
    fn sym_type_parses_and_toggles() {
        assert_eq!("standard".parse::<SymType>(), Ok(SymType::Standard));
        assert!("Classical".parse::<SymType>().is_err());
        assert_eq!(SymType::Classical.toggled(), SymType::Standard);
        assert_eq!(SymType::default(), SymType::Classical);
    }
}
