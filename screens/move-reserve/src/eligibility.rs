//! Eligibility rules for the selected animal and person.
//!
//! Both rule chains are pure: they turn a selection and the active policy
//! into an assessment value. Panel visibility is applied from that value by
//! the reducer, never from inside a rule.

use crate::selection::{AnimalSelection, PersonSelection};
use rust_decimal::Decimal;
use shelter_core::environment::{ConfigSource, Formatter, Translator};

/// Configuration that changes which notices are raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // One switch per configuration flag
pub struct EligibilityPolicy {
    /// Show the animal's adoption fee (`!DontShowAdoptionFee`)
    pub show_adoption_fee: bool,
    /// Warn about banned people (`WarnBannedOwner`)
    pub warn_banned_owner: bool,
    /// Warn about people without a homecheck (`WarnNoHomeCheck`)
    pub warn_no_homecheck: bool,
}

impl EligibilityPolicy {
    /// Read the policy from configuration flags
    #[must_use]
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        Self {
            show_adoption_fee: !config.boolean("DontShowAdoptionFee"),
            warn_banned_owner: config.boolean("WarnBannedOwner"),
            warn_no_homecheck: config.boolean("WarnNoHomeCheck"),
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            show_adoption_fee: true,
            warn_banned_owner: false,
            warn_no_homecheck: false,
        }
    }
}

/// How a notice affects the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The reservation cannot be submitted
    Blocking,
    /// The user should look before submitting
    Warning,
    /// Background information
    Informational,
}

/// Panel a notice is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Adoption fee information
    FeeInfo,
    /// Warning about the selected person
    OwnerWarning,
    /// The animal already has an active reservation
    MultipleReserve,
    /// The animal has left the shelter
    NotOnShelter,
}

impl Panel {
    /// Element id of the panel in the screen markup
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FeeInfo => "feeinfo",
            Self::OwnerWarning => "ownerwarn",
            Self::MultipleReserve => "multiplereserve",
            Self::NotOnShelter => "notonshelter",
        }
    }
}

/// A single eligibility finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Archived and not in foster care
    NotOnShelter,
    /// Another reservation is already open for the animal
    ActiveReservation,
    /// The animal has a non-zero adoption fee
    AdoptionFee(Decimal),
    /// The person is banned from adopting
    Banned,
    /// The person has been under investigation
    UnderInvestigation,
    /// The person has an animal control incident against them
    AnimalControlIncident,
    /// The person has not passed a homecheck
    NoHomecheck,
}

impl Notice {
    /// Severity of the notice
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NotOnShelter => Severity::Blocking,
            Self::AdoptionFee(_) => Severity::Informational,
            Self::ActiveReservation
            | Self::Banned
            | Self::UnderInvestigation
            | Self::AnimalControlIncident
            | Self::NoHomecheck => Severity::Warning,
        }
    }

    /// Panel the notice is shown in
    #[must_use]
    pub const fn panel(&self) -> Panel {
        match self {
            Self::NotOnShelter => Panel::NotOnShelter,
            Self::ActiveReservation => Panel::MultipleReserve,
            Self::AdoptionFee(_) => Panel::FeeInfo,
            Self::Banned
            | Self::UnderInvestigation
            | Self::AnimalControlIncident
            | Self::NoHomecheck => Panel::OwnerWarning,
        }
    }

    /// Untranslated message text
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::NotOnShelter => "This animal is not on the shelter.",
            Self::ActiveReservation => "This animal already has an active reservation.",
            Self::AdoptionFee(_) => "This animal has an adoption fee of {0}",
            Self::Banned => "This person has been banned from adopting animals",
            Self::UnderInvestigation => "This person has been under investigation",
            Self::AnimalControlIncident => "This person has an animal control incident against them",
            Self::NoHomecheck => "This person has not passed a homecheck",
        }
    }

    /// Localized panel text
    #[must_use]
    pub fn message(&self, translator: &dyn Translator, formatter: &dyn Formatter) -> String {
        let text = translator.translate(self.message_key());
        match self {
            Self::AdoptionFee(fee) => text.replace("{0}", &formatter.currency(*fee)),
            _ => text,
        }
    }
}

/// Outcome of the animal rule chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalAssessment {
    notices: Vec<Notice>,
}

impl AnimalAssessment {
    /// Notices in rule order
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Whether the animal cannot be reserved
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.severity() == Severity::Blocking)
    }
}

/// Outcome of the person rule chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonAssessment {
    /// The first matching warning, if any
    pub warning: Option<Notice>,
    /// Gift Aid status to mirror into the form
    pub gift_aid: bool,
}

/// Run the animal rule chain.
///
/// An archived animal that is not fostered blocks the reservation and no
/// other rule runs. Otherwise an open reservation warns and a non-zero fee
/// is reported when the policy shows fees.
#[must_use]
pub fn assess_animal(animal: &AnimalSelection, policy: &EligibilityPolicy) -> AnimalAssessment {
    if animal.is_archived && !animal.is_fostered() {
        return AnimalAssessment {
            notices: vec![Notice::NotOnShelter],
        };
    }

    let mut notices = Vec::new();
    if animal.has_active_reserve {
        notices.push(Notice::ActiveReservation);
    }
    if policy.show_adoption_fee {
        if let Some(fee) = animal.adoption_fee.filter(|fee| !fee.is_zero()) {
            notices.push(Notice::AdoptionFee(fee));
        }
    }

    AnimalAssessment { notices }
}

/// Run the person rule chain; the first matching rule wins.
#[must_use]
pub fn assess_person(person: &PersonSelection, policy: &EligibilityPolicy) -> PersonAssessment {
    let warning = if person.is_banned && policy.warn_banned_owner {
        Some(Notice::Banned)
    } else if person.investigation_count > 0 {
        Some(Notice::UnderInvestigation)
    } else if person.incident_count > 0 {
        Some(Notice::AnimalControlIncident)
    } else if !person.is_home_checked && policy.warn_no_homecheck {
        Some(Notice::NoHomecheck)
    } else {
        None
    };

    PersonAssessment {
        warning,
        gift_aid: person.is_gift_aid,
    }
}
