//! Document status lifecycles. Each document type has a fixed allowlist of
//! next statuses; there is no engine state behind these tables.

use crate::utils::error::{ErpError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub trait DocumentStatus: Copy + Eq + fmt::Debug + 'static {
    const DOCUMENT: &'static str;

    fn allowed_next(self) -> &'static [Self];

    fn as_str(self) -> &'static str;

    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

pub fn is_valid_transition<S: DocumentStatus>(current: S, target: S) -> bool {
    current.allowed_next().contains(&target)
}

pub fn ensure_transition<S: DocumentStatus>(current: S, target: S) -> Result<S> {
    if is_valid_transition(current, target) {
        Ok(target)
    } else {
        tracing::debug!(
            document = S::DOCUMENT,
            from = current.as_str(),
            to = target.as_str(),
            "rejected status transition"
        );
        Err(ErpError::InvalidTransition {
            document: S::DOCUMENT.to_string(),
            from: current.as_str().to_string(),
            to: target.as_str().to_string(),
        })
    }
}

macro_rules! document_status {
    (
        $(#[$meta:meta])*
        $name:ident, $document:literal {
            $($variant:ident => $text:literal : [$($next:ident),*]),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl DocumentStatus for $name {
            const DOCUMENT: &'static str = $document;

            fn allowed_next(self) -> &'static [Self] {
                match self {
                    $($name::$variant => &[$($name::$next),*]),+
                }
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ErpError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ErpError::validation(format!(
                        "unknown {} status '{}'",
                        $document, other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

document_status! {
    /// Bill of Lading.
    BillOfLadingStatus, "bill_of_lading" {
        Draft => "draft": [Submitted, Cancelled],
        Submitted => "submitted": [Issued, Draft, Cancelled],
        Issued => "issued": [Released, Surrendered],
        Released => "released": [],
        Surrendered => "surrendered": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    /// PIB customs import declaration.
    PibStatus, "pib" {
        Draft => "draft": [Submitted, Cancelled],
        Submitted => "submitted": [DocumentCheck, Cancelled],
        DocumentCheck => "document_check": [PhysicalCheck, DutiesPaid],
        PhysicalCheck => "physical_check": [DutiesPaid],
        DutiesPaid => "duties_paid": [Released],
        Released => "released": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    /// Journey Management Plan.
    JmpStatus, "journey_management_plan" {
        Draft => "draft": [PendingApproval, Cancelled],
        PendingApproval => "pending_approval": [Approved, Draft, Cancelled],
        Approved => "approved": [Active, Cancelled],
        Active => "active": [Completed],
        Completed => "completed": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    /// Proforma Job Order.
    PjoStatus, "pjo" {
        Draft => "draft": [PendingApproval, Cancelled],
        PendingApproval => "pending_approval": [Approved, Rejected],
        Rejected => "rejected": [Draft],
        Approved => "approved": [Converted],
        Converted => "converted": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    JobOrderStatus, "job_order" {
        Active => "active": [Completed, Cancelled],
        Completed => "completed": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    /// BKK disbursement voucher.
    BkkStatus, "bkk" {
        Draft => "draft": [PendingApproval, Cancelled],
        PendingApproval => "pending_approval": [Approved, Rejected],
        Rejected => "rejected": [Draft],
        Approved => "approved": [Disbursed],
        Disbursed => "disbursed": [Settled],
        Settled => "settled": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    InvoiceStatus, "invoice" {
        Draft => "draft": [Sent, Cancelled],
        Sent => "sent": [PartiallyPaid, Paid, Overdue, Cancelled],
        PartiallyPaid => "partially_paid": [Paid, Overdue],
        Overdue => "overdue": [PartiallyPaid, Paid],
        Paid => "paid": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    AgreementStatus, "agency_agreement" {
        Draft => "draft": [UnderReview, Cancelled],
        UnderReview => "under_review": [Draft, Approved],
        Approved => "approved": [Signed, Cancelled],
        Signed => "signed": [],
        Cancelled => "cancelled": [],
    }
}

document_status! {
    EngineeringDocStatus, "engineering_document" {
        Draft => "draft": [InReview],
        InReview => "in_review": [Draft, Approved],
        Approved => "approved": [Archived],
        Archived => "archived": [],
    }
}

/// Names a lifecycle table so transitions can be checked from plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DocumentKind {
    BillOfLading,
    Pib,
    Jmp,
    Pjo,
    JobOrder,
    Bkk,
    Invoice,
    Agreement,
    EngineeringDoc,
}

fn check_str<S>(from: &str, to: &str) -> Result<bool>
where
    S: DocumentStatus + FromStr<Err = ErpError>,
{
    let from: S = from.parse()?;
    let to: S = to.parse()?;
    Ok(is_valid_transition(from, to))
}

fn next_str<S>(from: &str) -> Result<Vec<&'static str>>
where
    S: DocumentStatus + FromStr<Err = ErpError>,
{
    let from: S = from.parse()?;
    Ok(from.allowed_next().iter().map(|s| s.as_str()).collect())
}

impl DocumentKind {
    pub fn document_name(self) -> &'static str {
        match self {
            DocumentKind::BillOfLading => BillOfLadingStatus::DOCUMENT,
            DocumentKind::Pib => PibStatus::DOCUMENT,
            DocumentKind::Jmp => JmpStatus::DOCUMENT,
            DocumentKind::Pjo => PjoStatus::DOCUMENT,
            DocumentKind::JobOrder => JobOrderStatus::DOCUMENT,
            DocumentKind::Bkk => BkkStatus::DOCUMENT,
            DocumentKind::Invoice => InvoiceStatus::DOCUMENT,
            DocumentKind::Agreement => AgreementStatus::DOCUMENT,
            DocumentKind::EngineeringDoc => EngineeringDocStatus::DOCUMENT,
        }
    }

    /// Unknown status names are an error; a known but disallowed pair is `Ok(false)`.
    pub fn validate_transition_str(self, from: &str, to: &str) -> Result<bool> {
        match self {
            DocumentKind::BillOfLading => check_str::<BillOfLadingStatus>(from, to),
            DocumentKind::Pib => check_str::<PibStatus>(from, to),
            DocumentKind::Jmp => check_str::<JmpStatus>(from, to),
            DocumentKind::Pjo => check_str::<PjoStatus>(from, to),
            DocumentKind::JobOrder => check_str::<JobOrderStatus>(from, to),
            DocumentKind::Bkk => check_str::<BkkStatus>(from, to),
            DocumentKind::Invoice => check_str::<InvoiceStatus>(from, to),
            DocumentKind::Agreement => check_str::<AgreementStatus>(from, to),
            DocumentKind::EngineeringDoc => check_str::<EngineeringDocStatus>(from, to),
        }
    }

    pub fn allowed_next_str(self, from: &str) -> Result<Vec<&'static str>> {
        match self {
            DocumentKind::BillOfLading => next_str::<BillOfLadingStatus>(from),
            DocumentKind::Pib => next_str::<PibStatus>(from),
            DocumentKind::Jmp => next_str::<JmpStatus>(from),
            DocumentKind::Pjo => next_str::<PjoStatus>(from),
            DocumentKind::JobOrder => next_str::<JobOrderStatus>(from),
            DocumentKind::Bkk => next_str::<BkkStatus>(from),
            DocumentKind::Invoice => next_str::<InvoiceStatus>(from),
            DocumentKind::Agreement => next_str::<AgreementStatus>(from),
            DocumentKind::EngineeringDoc => next_str::<EngineeringDocStatus>(from),
        }
    }
}

pub fn validate_transition_str(kind: DocumentKind, from: &str, to: &str) -> Result<bool> {
    kind.validate_transition_str(from, to)
}
