use std::collections::HashMap;
use std::fmt::{self, Formatter};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::event_file::error::ParseError;
use crate::event_file::traits::{
    parse_inning, parse_side, record_text, FromRetrosheetRecord, HalfInning, Inning, PlayerId,
    RetrosheetEventRecord, Side,
};
use crate::util::leading_alphabetic;

/// Characters that end the main play and begin runner advance info.
const MAIN_PLAY_TERMINATORS: [char; 4] = ['.', '+', '(', ';'];
const MODIFIER_SEPARATOR: char = '/';

/// inning, side, batter, count, pitches, descriptor
const PLAY_FIELD_COUNT: usize = 6;

lazy_static! {
    static ref OUTCOME_CODES: HashMap<&'static str, Outcome> = code_table(Outcome::iter());
    static ref MODIFIER_CODES: HashMap<&'static str, OutcomeModifier> =
        code_table(OutcomeModifier::iter());
}

trait Coded: Copy {
    fn codes(self) -> &'static [&'static str];

    /// Lower wins when two tags claim the same code.
    fn code_precedence(self) -> u8 {
        0
    }
}

fn code_table<T: Coded>(tags: impl Iterator<Item = T>) -> HashMap<&'static str, T> {
    let mut table: HashMap<&'static str, T> = HashMap::new();
    for tag in tags {
        for &code in tag.codes() {
            table
                .entry(code)
                .and_modify(|held| {
                    if tag.code_precedence() < held.code_precedence() {
                        *held = tag;
                    }
                })
                .or_insert(tag);
        }
    }
    table
}

#[derive(
    Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Single,
    Double,
    Triple,
    HomeRun,
    GroundRuleDouble,
    Walk,
    IntentionalWalk,
    CatcherInterference,
    HitByPitch,
    Strikeout,
    FieldersChoice,
    Error,
    ErrorOnFoulFlyBall,
    NoPlay,
    CaughtStealing,
    StolenBase,
    WildPitch,
    Balk,
    PassedBall,
    PickedOff,
    PickedOffCaughtStealing,
    DefensiveIndifference,
    OtherAdvance,
    /// Not a Retrosheet code. A main play made only of fielder numbers.
    FieldedOut,
}

impl Coded for Outcome {
    fn codes(self) -> &'static [&'static str] {
        match self {
            Self::Single => &["S"],
            Self::Double => &["D"],
            Self::Triple => &["T"],
            Self::HomeRun => &["H", "HR"],
            Self::GroundRuleDouble => &["DGR"],
            Self::Walk => &["W"],
            Self::IntentionalWalk => &["I", "IW"],
            Self::CatcherInterference => &["C"],
            Self::HitByPitch => &["HP"],
            Self::Strikeout => &["K"],
            Self::FieldersChoice => &["FC"],
            Self::Error => &["E"],
            Self::ErrorOnFoulFlyBall => &["FLE"],
            Self::NoPlay => &["NP"],
            // The base is part of the code, and home is the only alphabetic base
            Self::CaughtStealing => &["CS", "CSH"],
            Self::StolenBase => &["SB", "SBH"],
            Self::WildPitch => &["WP"],
            Self::Balk => &["BK"],
            Self::PassedBall => &["PB"],
            Self::PickedOff => &["PO"],
            Self::PickedOffCaughtStealing => &["POCS", "POCSH"],
            Self::DefensiveIndifference => &["DI"],
            Self::OtherAdvance => &["OA"],
            Self::FieldedOut => &[],
        }
    }
}

impl Outcome {
    /// Resolves the main play of a full descriptor such as `S7/L+.1-3`.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, ParseError> {
        let main_play = descriptor
            .split(MODIFIER_SEPARATOR)
            .next()
            .unwrap_or_default();
        let main_play = main_play
            .split(&MAIN_PLAY_TERMINATORS[..])
            .next()
            .unwrap_or_default();

        let code = leading_alphabetic(main_play);
        if code.is_empty() {
            // Only fielder numbers, e.g. `63` or `8`
            return Ok(Self::FieldedOut);
        }
        Self::from_code(code).ok_or_else(|| ParseError::UnrecognizedOutcome {
            code: code.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    pub fn from_code(code: &str) -> Option<Self> {
        OUTCOME_CODES.get(code).copied()
    }

    pub fn all_codes(self) -> &'static [&'static str] {
        self.codes()
    }

    pub const fn is_hit(self) -> bool {
        matches!(
            self,
            Self::Single | Self::Double | Self::Triple | Self::HomeRun | Self::GroundRuleDouble
        )
    }

    pub const fn is_walk(self) -> bool {
        matches!(self, Self::Walk | Self::IntentionalWalk)
    }

    pub const fn is_hit_by_pitch(self) -> bool {
        matches!(self, Self::HitByPitch)
    }

    pub const fn is_at_bat(self) -> bool {
        !matches!(self, Self::NoPlay | Self::CaughtStealing)
            && !self.is_walk()
            && !self.is_hit_by_pitch()
    }

    pub const fn total_bases(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double | Self::GroundRuleDouble => 2,
            Self::Triple => 3,
            Self::HomeRun => 4,
            _ => 0,
        }
    }
}

#[derive(
    Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeModifier {
    AppealPlay,
    PopUpBunt,
    GroundBallBunt,
    BuntGroundedIntoDoublePlay,
    BatterInterference,
    LineDriveBunt,
    BattingOutOfTurn,
    /// Shares `BP` with `PopUpBunt` and never wins the lookup.
    BuntPopUp,
    BuntPoppedIntoDoublePlay,
    RunnerHitByBattedBall,
    CalledThirdStrike,
    CourtesyBatter,
    CourtesyFielder,
    CourtesyRunner,
    UnspecifiedDoublePlay,
    ErrorOnFielder,
    Fly,
    FlyBallDoublePlay,
    FanInterference,
    Foul,
    ForceOut,
    GroundBall,
    GroundBallDoublePlay,
    GroundBallTriplePlay,
    InfieldFlyRule,
    Interference,
    InsideTheParkHomeRun,
    LineDrive,
    LinedIntoDoublePlay,
    LinedIntoTriplePlay,
    ManagerChallengeOfCallOnField,
    NoDoublePlayCredited,
    Obstruction,
    PopFly,
    RunnerOutPassingAnotherRunner,
    RelayToFielderWithNoOutMade,
    RunnerInterference,
    SacrificeFly,
    SacrificeHit,
    Throw,
    UnspecifiedTriplePlay,
    UmpireInterference,
    UmpireReviewOfCallOnField,
    UnspecifiedBunt,
    FoulBunt,
    Unknown,
}

impl Coded for OutcomeModifier {
    fn codes(self) -> &'static [&'static str] {
        match self {
            Self::AppealPlay => &["AP"],
            Self::PopUpBunt | Self::BuntPopUp => &["BP"],
            Self::GroundBallBunt => &["BG"],
            Self::BuntGroundedIntoDoublePlay => &["BGDP"],
            Self::BatterInterference => &["BINT"],
            Self::LineDriveBunt => &["BL"],
            Self::BattingOutOfTurn => &["BOOT"],
            Self::BuntPoppedIntoDoublePlay => &["BPDP"],
            Self::RunnerHitByBattedBall => &["BR"],
            Self::CalledThirdStrike => &["C"],
            Self::CourtesyBatter => &["COUB"],
            Self::CourtesyFielder => &["COUF"],
            Self::CourtesyRunner => &["COUR"],
            Self::UnspecifiedDoublePlay => &["DP"],
            Self::ErrorOnFielder => &["E"],
            Self::Fly => &["F"],
            Self::FlyBallDoublePlay => &["FDP"],
            Self::FanInterference => &["FINT"],
            Self::Foul => &["FL"],
            Self::ForceOut => &["FO"],
            Self::GroundBall => &["G"],
            Self::GroundBallDoublePlay => &["GDP"],
            Self::GroundBallTriplePlay => &["GTP"],
            Self::InfieldFlyRule => &["IF"],
            Self::Interference => &["INT"],
            Self::InsideTheParkHomeRun => &["IPHR"],
            Self::LineDrive => &["L"],
            Self::LinedIntoDoublePlay => &["LDP"],
            Self::LinedIntoTriplePlay => &["LTP"],
            Self::ManagerChallengeOfCallOnField => &["MREV"],
            Self::NoDoublePlayCredited => &["NDP"],
            Self::Obstruction => &["OBS"],
            Self::PopFly => &["P"],
            Self::RunnerOutPassingAnotherRunner => &["PASS"],
            Self::RelayToFielderWithNoOutMade => &["R"],
            Self::RunnerInterference => &["RINT"],
            Self::SacrificeFly => &["SF"],
            Self::SacrificeHit => &["SH"],
            // THH is a throw home
            Self::Throw => &["TH", "THH"],
            Self::UnspecifiedTriplePlay => &["TP"],
            Self::UmpireInterference => &["UINT"],
            Self::UmpireReviewOfCallOnField => &["UREV"],
            Self::UnspecifiedBunt => &["B"],
            Self::FoulBunt => &["BF"],
            Self::Unknown => &["U"],
        }
    }

    fn code_precedence(self) -> u8 {
        match self {
            Self::BuntPopUp => 1,
            _ => 0,
        }
    }
}

impl OutcomeModifier {
    /// Resolves one `/`-separated modifier token such as `L+` or `G56`.
    pub fn from_token(token: &str, descriptor: &str) -> Result<Self, ParseError> {
        let code = leading_alphabetic(token);
        Self::from_code(code).ok_or_else(|| ParseError::UnrecognizedModifier {
            code: code.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    pub fn from_code(code: &str) -> Option<Self> {
        MODIFIER_CODES.get(code).copied()
    }

    pub fn all_codes(self) -> &'static [&'static str] {
        self.codes()
    }

    /// Every modifier in a full descriptor, in the order written.
    pub fn parse_all(descriptor: &str) -> Result<Vec<Self>, ParseError> {
        descriptor
            .split(MODIFIER_SEPARATOR)
            .skip(1)
            .map(|token| Self::from_token(token, descriptor))
            .collect()
    }

    pub const fn is_sacrifice_fly(self) -> bool {
        matches!(self, Self::SacrificeFly)
    }
}

/// How a plate appearance counts toward on-base percentage. Variants are
/// listed in the priority used to pick one.
#[derive(
    Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Display, Serialize, Deserialize,
)]
pub enum ObpClass {
    #[strum(to_string = "HIT, AB")]
    HitAtBat,
    #[strum(to_string = "WALK")]
    Walk,
    #[strum(to_string = "HBP")]
    HitByPitch,
    #[strum(to_string = "SF, AB")]
    SacrificeFlyAtBat,
    #[strum(to_string = "AB")]
    AtBat,
    #[strum(to_string = "N/A")]
    NotApplicable,
}

impl ObpClass {
    pub const fn in_obp_numerator(self) -> bool {
        matches!(
            self,
            Self::HitAtBat | Self::Walk | Self::HitByPitch | Self::SacrificeFlyAtBat
        )
    }

    pub const fn in_obp_denominator(self) -> bool {
        !matches!(self, Self::NotApplicable)
    }

    /// At-bats as batting average and slugging count them, which leaves out
    /// sacrifice flies.
    pub const fn is_official_at_bat(self) -> bool {
        matches!(self, Self::HitAtBat | Self::AtBat)
    }
}

/// One `play` record, decoded.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PlateAppearance {
    pub inning: Inning,
    pub batting_side: Side,
    pub batter: PlayerId,
    pub descriptor: String,
    pub outcome: Outcome,
    pub modifiers: Vec<OutcomeModifier>,
}

impl PlateAppearance {
    pub fn new(
        inning: Inning,
        batting_side: Side,
        batter: &str,
        descriptor: &str,
    ) -> Result<Self, ParseError> {
        if descriptor.trim().is_empty() {
            return Err(ParseError::malformed("empty play descriptor", descriptor));
        }
        Ok(Self {
            inning,
            batting_side,
            batter: batter.to_string(),
            descriptor: descriptor.to_string(),
            outcome: Outcome::from_descriptor(descriptor)?,
            modifiers: OutcomeModifier::parse_all(descriptor)?,
        })
    }

    /// Builds from the fields of a `play` line without its record-type tag:
    /// inning, side, batter, count, pitches, descriptor. Only the first three
    /// and the last are read.
    pub fn from_fields(fields: &[&str]) -> Result<Self, ParseError> {
        let text = fields.join(",");
        if fields.len() < PLAY_FIELD_COUNT {
            return Err(ParseError::malformed(
                format!(
                    "expected {PLAY_FIELD_COUNT} play fields, found {}",
                    fields.len()
                ),
                text,
            ));
        }
        let inning = parse_inning(fields[0], &text)?;
        let batting_side = parse_side(fields[1], &text)?;
        let batter = fields[2].trim();
        if batter.is_empty() {
            return Err(ParseError::malformed("missing batter", text));
        }
        let descriptor = fields[fields.len() - 1].trim();
        Self::new(inning, batting_side, batter, descriptor).map_err(|e| match e {
            ParseError::MalformedRecord { reason, .. } => ParseError::malformed(reason, text),
            other => other,
        })
    }

    pub const fn half_inning(&self) -> HalfInning {
        HalfInning {
            inning: self.inning,
            batting_side: self.batting_side,
        }
    }

    pub fn is_sacrifice_fly(&self) -> bool {
        self.modifiers.iter().any(|m| m.is_sacrifice_fly())
    }

    pub const fn results_in_on_base(&self) -> bool {
        self.outcome.is_hit() || self.outcome.is_walk() || self.outcome.is_hit_by_pitch()
    }

    pub fn obp_class(&self) -> ObpClass {
        let outcome = self.outcome;
        if outcome.is_hit() {
            ObpClass::HitAtBat
        } else if outcome.is_walk() {
            ObpClass::Walk
        } else if outcome.is_hit_by_pitch() {
            ObpClass::HitByPitch
        } else if self.is_sacrifice_fly() {
            ObpClass::SacrificeFlyAtBat
        } else if outcome.is_at_bat() {
            ObpClass::AtBat
        } else {
            ObpClass::NotApplicable
        }
    }

    pub const fn total_bases(&self) -> u32 {
        self.outcome.total_bases()
    }

    /// e.g. `SINGLE/LINE_DRIVE (S7/L+)`
    pub fn pretty_description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PlateAppearance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcome)?;
        for modifier in &self.modifiers {
            write!(f, "/{modifier}")?;
        }
        write!(f, " ({})", self.descriptor)
    }
}

impl FromRetrosheetRecord for PlateAppearance {
    fn new(record: &RetrosheetEventRecord) -> Result<Self, ParseError> {
        match record.get(0) {
            Some("play") => {
                let fields = record.iter().skip(1).collect::<Vec<&str>>();
                Self::from_fields(&fields).map_err(|e| match e {
                    ParseError::MalformedRecord { reason, .. } => {
                        ParseError::malformed(reason, record_text(record))
                    }
                    other => other,
                })
            }
            _ => Err(Self::error("Not a play record", record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pa(descriptor: &str) -> PlateAppearance {
        PlateAppearance::new(1, Side::Away, "batter01", descriptor).unwrap()
    }

    #[test]
    fn single_with_line_drive() {
        let play = pa("S7/L+");
        assert_eq!(play.outcome, Outcome::Single);
        assert_eq!(play.modifiers, vec![OutcomeModifier::LineDrive]);
        assert_eq!(play.obp_class(), ObpClass::HitAtBat);
        assert_eq!(play.descriptor, "S7/L+");
    }

    #[test]
    fn double_play_ground_out() {
        let play = pa("64(1)3/GDP");
        assert_eq!(play.outcome, Outcome::FieldedOut);
        assert_eq!(play.modifiers, vec![OutcomeModifier::GroundBallDoublePlay]);
        assert_eq!(play.obp_class(), ObpClass::AtBat);
    }

    #[test]
    fn walk_is_on_base_but_not_at_bat() {
        let play = pa("W");
        assert_eq!(play.outcome, Outcome::Walk);
        assert_eq!(play.obp_class(), ObpClass::Walk);
        assert!(play.results_in_on_base());
        assert!(!play.outcome.is_at_bat());
        assert!(!play.obp_class().is_official_at_bat());
    }

    #[test]
    fn every_outcome_code_parses_with_any_annotation() {
        for outcome in Outcome::iter() {
            for code in outcome.all_codes() {
                assert_eq!(Outcome::from_descriptor(code).unwrap(), outcome, "{code}");
                for suffix in [".1-2", "+SB2", "(1)", ";B-1"] {
                    let descriptor = format!("{code}{suffix}");
                    assert_eq!(
                        Outcome::from_descriptor(&descriptor).unwrap(),
                        outcome,
                        "{descriptor}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_modifier_code_parses() {
        for modifier in OutcomeModifier::iter() {
            for code in modifier.all_codes() {
                let expected = if modifier == OutcomeModifier::BuntPopUp {
                    OutcomeModifier::PopUpBunt
                } else {
                    modifier
                };
                let play = pa(&format!("8/{code}"));
                assert_eq!(play.modifiers, vec![expected], "{code}");
                let play = pa(&format!("8/{code}7.2-3"));
                assert_eq!(play.modifiers, vec![expected], "{code}");
            }
        }
    }

    #[test]
    fn modifier_codes_are_unique_apart_from_bunt_pop_up() {
        let mut seen = HashMap::new();
        for modifier in OutcomeModifier::iter() {
            for code in modifier.all_codes() {
                if let Some(previous) = seen.insert(*code, modifier) {
                    assert_eq!(*code, "BP");
                    assert_eq!(previous, OutcomeModifier::PopUpBunt);
                    assert_eq!(modifier, OutcomeModifier::BuntPopUp);
                }
            }
        }
        assert_eq!(OutcomeModifier::from_code("BP"), Some(OutcomeModifier::PopUpBunt));
    }

    #[test]
    fn outcome_aliases() {
        assert_eq!(Outcome::from_code("H"), Some(Outcome::HomeRun));
        assert_eq!(Outcome::from_code("HR"), Some(Outcome::HomeRun));
        assert_eq!(Outcome::from_code("IW"), Some(Outcome::IntentionalWalk));
        assert_eq!(Outcome::from_descriptor("SBH").unwrap(), Outcome::StolenBase);
        assert_eq!(
            Outcome::from_descriptor("POCSH(1361)").unwrap(),
            Outcome::PickedOffCaughtStealing
        );
        assert_eq!(Outcome::from_descriptor("HP").unwrap(), Outcome::HitByPitch);
        assert_eq!(Outcome::from_descriptor("DGR/L9LS").unwrap(), Outcome::GroundRuleDouble);
    }

    #[test]
    fn numeric_main_play_is_fielded_out() {
        for descriptor in ["6", "43", "8", "543(1)/GTP"] {
            assert_eq!(Outcome::from_descriptor(descriptor).unwrap(), Outcome::FieldedOut);
        }
        assert!(pa("43").modifiers.is_empty());
        assert_eq!(
            pa("43/G4").modifiers,
            vec![OutcomeModifier::GroundBall]
        );
    }

    #[test]
    fn annotations_after_main_play_are_ignored() {
        let play = pa("K+WP.1-2");
        assert_eq!(play.outcome, Outcome::Strikeout);
        assert!(play.modifiers.is_empty());
        let play = pa("W+SB2");
        assert_eq!(play.outcome, Outcome::Walk);
        let play = pa("E6(1);B-1");
        assert_eq!(play.outcome, Outcome::Error);
    }

    #[test]
    fn modifiers_keep_order_and_duplicates() {
        let play = pa("8(B)84(2)/LDP/L8/L");
        assert_eq!(
            play.modifiers,
            vec![
                OutcomeModifier::LinedIntoDoublePlay,
                OutcomeModifier::LineDrive,
                OutcomeModifier::LineDrive
            ]
        );
    }

    #[test]
    fn empty_modifier_tokens_are_errors() {
        for descriptor in ["S7/", "S7//L", "S7/78"] {
            assert_eq!(
                PlateAppearance::new(1, Side::Away, "b", descriptor),
                Err(ParseError::UnrecognizedModifier {
                    code: String::new(),
                    descriptor: descriptor.to_string()
                }),
                "{descriptor}"
            );
        }
    }

    #[test]
    fn unknown_codes_are_errors() {
        assert_eq!(
            Outcome::from_descriptor("ZZ7"),
            Err(ParseError::UnrecognizedOutcome {
                code: "ZZ".to_string(),
                descriptor: "ZZ7".to_string()
            })
        );
        assert_eq!(
            PlateAppearance::new(1, Side::Home, "b", "S7/QQ"),
            Err(ParseError::UnrecognizedModifier {
                code: "QQ".to_string(),
                descriptor: "S7/QQ".to_string()
            })
        );
    }

    #[test]
    fn hit_beats_sacrifice_fly() {
        let play = pa("S9/SF");
        assert!(play.is_sacrifice_fly());
        assert_eq!(play.obp_class(), ObpClass::HitAtBat);
        let play = pa("9/SF.3-H");
        assert_eq!(play.obp_class(), ObpClass::SacrificeFlyAtBat);
        assert!(!play.obp_class().is_official_at_bat());
        assert!(play.obp_class().in_obp_denominator());
    }

    #[test]
    fn classification_of_non_plate_appearances() {
        assert_eq!(pa("NP").obp_class(), ObpClass::NotApplicable);
        assert_eq!(pa("CS2(24)").obp_class(), ObpClass::NotApplicable);
        assert_eq!(pa("HP").obp_class(), ObpClass::HitByPitch);
        assert_eq!(pa("K").obp_class(), ObpClass::AtBat);
        assert_eq!(ObpClass::SacrificeFlyAtBat.to_string(), "SF, AB");
    }

    #[test]
    fn from_play_record_fields() {
        let play =
            PlateAppearance::from_fields(&["7", "1", "troum001", "12", "BCX", "HR/F89D"]).unwrap();
        assert_eq!(play.inning, 7);
        assert_eq!(play.batting_side, Side::Home);
        assert_eq!(play.batter, "troum001");
        assert_eq!(play.outcome, Outcome::HomeRun);
        assert_eq!(play.modifiers, vec![OutcomeModifier::Fly]);
        assert_eq!(play.total_bases(), 4);
    }

    #[test]
    fn malformed_play_records() {
        assert!(matches!(
            PlateAppearance::from_fields(&["1", "0", "troum001"]),
            Err(ParseError::MalformedRecord { .. })
        ));
        assert!(matches!(
            PlateAppearance::from_fields(&["first", "0", "troum001", "", "", "S7"]),
            Err(ParseError::MalformedRecord { .. })
        ));
        assert!(matches!(
            PlateAppearance::from_fields(&["1", "0", "troum001", "", "", ""]),
            Err(ParseError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn from_csv_record() {
        let record = RetrosheetEventRecord::from(vec!["play", "2", "0", "semim001", "01", "CX", "D7/L"]);
        let play = <PlateAppearance as FromRetrosheetRecord>::new(&record).unwrap();
        assert_eq!(play.outcome, Outcome::Double);
        let record = RetrosheetEventRecord::from(vec!["com", "hello"]);
        assert!(<PlateAppearance as FromRetrosheetRecord>::new(&record).is_err());
    }

    #[test]
    fn pretty_description() {
        assert_eq!(
            pa("S7/L+").pretty_description(),
            "SINGLE/LINE_DRIVE (S7/L+)"
        );
        assert_eq!(pa("W").pretty_description(), "WALK (W)");
    }
}
