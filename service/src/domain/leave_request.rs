//! [`LeaveRequest`] definitions.

use common::{calendar, define_kind, unit, DateOf, Days};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::employee;
#[cfg(doc)]
use crate::domain::Employee;

/// Request of an [`Employee`] to take leave.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeaveRequest {
    /// ID of this [`LeaveRequest`].
    pub id: Id,

    /// ID of the [`Employee`] owning this [`LeaveRequest`].
    pub owner_id: employee::Id,

    /// [`Kind`] of the requested leave.
    pub kind: Kind,

    /// First day of the requested leave.
    pub start_date: StartDate,

    /// Last (inclusive) day of the requested leave.
    pub end_date: EndDate,

    /// [`Reason`] given by the owner.
    pub reason: Reason,

    /// [`Status`] of this [`LeaveRequest`].
    pub status: Status,

    /// [`Reason`] given by the approver who rejected this [`LeaveRequest`].
    pub rejection_reason: Option<Reason>,

    /// Number of leave days this [`LeaveRequest`] takes.
    ///
    /// [`None`] is counted as zero days.
    pub day_count: Option<Days>,

    /// [`ApprovalStep`]s ordered by their [`ApprovalOrder`].
    pub approval_steps: Vec<ApprovalStep>,
}

impl LeaveRequest {
    /// Returns the [`ApprovalStep`] of the provided approver, if any.
    #[must_use]
    pub fn step_of(&self, approver_id: employee::Id) -> Option<&ApprovalStep> {
        self.approval_steps
            .iter()
            .find(|s| s.approver_id == approver_id)
    }

    /// Indicates whether the provided approver is the one expected to decide
    /// on this [`LeaveRequest`] next.
    #[must_use]
    pub fn awaits(&self, approver_id: employee::Id) -> bool {
        self.check_turn(approver_id).is_ok()
    }

    /// Records the `decision` of the provided approver made on the `date`.
    ///
    /// An approval completes the [`LeaveRequest`] once no [`ApprovalStep`]
    /// is left pending. A rejection completes it immediately.
    ///
    /// # Errors
    ///
    /// If the approver has no pending [`ApprovalStep`] here, or an earlier
    /// [`ApprovalStep`] is not approved yet.
    pub fn decide(
        &mut self,
        approver_id: employee::Id,
        decision: Decision,
        date: DecisionDate,
        rejection_reason: Option<Reason>,
    ) -> Result<(), DecisionError> {
        let idx = self.check_turn(approver_id)?;

        let step = &mut self.approval_steps[idx];
        step.decided_on = Some(date);
        match decision {
            Decision::Approve => {
                step.status = Status::Approved;
                if self
                    .approval_steps
                    .iter()
                    .all(|s| s.status != Status::Pending)
                {
                    self.status = Status::Approved;
                }
            }
            Decision::Reject => {
                step.status = Status::Rejected;
                self.status = Status::Rejected;
                self.rejection_reason = rejection_reason;
            }
        }
        Ok(())
    }

    /// Checks the provided approver may decide now, returning the index of
    /// their [`ApprovalStep`].
    fn check_turn(
        &self,
        approver_id: employee::Id,
    ) -> Result<usize, DecisionError> {
        use DecisionError as E;

        let idx = self
            .approval_steps
            .iter()
            .position(|s| s.approver_id == approver_id)
            .ok_or(E::NotApprover)?;
        let step = &self.approval_steps[idx];

        if self.status != Status::Pending || step.status != Status::Pending {
            return Err(E::AlreadyDecided);
        }
        if self
            .approval_steps
            .iter()
            .any(|s| s.order < step.order && s.status != Status::Approved)
        {
            return Err(E::EarlierStepPending);
        }
        Ok(idx)
    }
}

/// ID of a [`LeaveRequest`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// First day of a [`LeaveRequest`].
pub type StartDate = DateOf<unit::Start>;

/// Last (inclusive) day of a [`LeaveRequest`].
pub type EndDate = DateOf<unit::End>;

/// Date an [`ApprovalStep`] was decided on.
pub type DecisionDate = DateOf<unit::Decision>;

define_kind! {
    #[doc = "Kind of a [`LeaveRequest`]."]
    enum Kind {
        #[doc = "Full-day annual leave."]
        Annual = 1,

        #[doc = "Half of a working day."]
        HalfDay = 2,

        #[doc = "Sick leave."]
        Sick = 3,

        #[doc = "Any other leave."]
        Other = 4,
    }
}

impl Kind {
    /// Counts leave days taken by a [`LeaveRequest`] of this [`Kind`] over
    /// the inclusive `start..=end` range.
    ///
    /// [`Kind::HalfDay`] is always half a day. Other kinds count Monday to
    /// Friday dates only.
    #[must_use]
    pub fn day_count(self, start: StartDate, end: EndDate) -> Days {
        match self {
            Self::HalfDay => Days::HALF,
            Self::Annual | Self::Sick | Self::Other => {
                calendar::weekdays_between(start.get(), end.get()).into()
            }
        }
    }
}

define_kind! {
    #[doc = "Status of a [`LeaveRequest`] or an [`ApprovalStep`]."]
    enum Status {
        #[doc = "Waiting for a decision."]
        Pending = 1,

        #[doc = "Approved."]
        Approved = 2,

        #[doc = "Rejected."]
        Rejected = 3,
    }
}

/// Reason of a [`LeaveRequest`] or of its rejection.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Reason`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

/// Step of the sequential approval of a [`LeaveRequest`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ApprovalStep {
    /// ID of the [`Employee`] deciding on this [`ApprovalStep`].
    pub approver_id: employee::Id,

    /// [`ApprovalOrder`] of this [`ApprovalStep`].
    pub order: ApprovalOrder,

    /// [`Status`] of this [`ApprovalStep`].
    pub status: Status,

    /// Date this [`ApprovalStep`] was decided on.
    pub decided_on: Option<DecisionDate>,
}

/// 1-based position of an [`ApprovalStep`] in the approval sequence.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ApprovalOrder(i16);

/// Decision of an approver.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Decision {
    /// Approve the [`LeaveRequest`].
    Approve,

    /// Reject the [`LeaveRequest`].
    Reject,
}

/// Error of deciding on a [`LeaveRequest`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum DecisionError {
    /// The [`Employee`] has no [`ApprovalStep`] in the [`LeaveRequest`].
    #[display("not an approver of the `LeaveRequest`")]
    NotApprover,

    /// The [`ApprovalStep`] or the whole [`LeaveRequest`] is decided already.
    #[display("already decided")]
    AlreadyDecided,

    /// An earlier [`ApprovalStep`] still awaits approval.
    #[display("an earlier approval step is not approved yet")]
    EarlierStepPending,
}

#[cfg(test)]
mod spec {
    use common::{Date, Days};
    use serde::{de::DeserializeOwned, Serialize};

    use crate::domain::employee;

    use super::{
        ApprovalOrder, ApprovalStep, Decision, DecisionError, Id, Kind,
        LeaveRequest, Reason, Status,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn request(approvers: &[employee::Id]) -> LeaveRequest {
        LeaveRequest {
            id: Id::new(),
            owner_id: employee::Id::new(),
            kind: Kind::Annual,
            start_date: date("2024-06-07").coerce(),
            end_date: date("2024-06-10").coerce(),
            reason: Reason::new("vacation").unwrap(),
            status: Status::Pending,
            rejection_reason: None,
            day_count: Some(Days::from(2)),
            approval_steps: approvers
                .iter()
                .zip(1..)
                .map(|(&approver_id, order)| ApprovalStep {
                    approver_id,
                    order: ApprovalOrder::from(order),
                    status: Status::Pending,
                    decided_on: None,
                })
                .collect(),
        }
    }

    #[test]
    fn kinds_use_screaming_snake_case_strings() {
        fn serializable<T: Serialize + DeserializeOwned>() {}
        serializable::<Kind>();
        serializable::<Status>();

        assert_eq!(Kind::HalfDay.to_string(), "HALF_DAY");
        assert_eq!("SICK".parse::<Kind>().unwrap(), Kind::Sick);
        assert_eq!(Status::Rejected.to_string(), "REJECTED");
        assert!("rejected".parse::<Status>().is_err());
    }

    #[test]
    fn counts_weekdays_only() {
        let (start, end) = (date("2024-06-07"), date("2024-06-10"));
        assert_eq!(
            Kind::Annual.day_count(start.coerce(), end.coerce()),
            Days::from(2),
        );
        assert_eq!(
            Kind::Sick.day_count(start.coerce(), end.coerce()),
            Days::from(2),
        );
        let weekend = (date("2024-06-08"), date("2024-06-09"));
        assert_eq!(
            Kind::Other.day_count(weekend.0.coerce(), weekend.1.coerce()),
            Days::ZERO,
        );
    }

    #[test]
    fn half_day_is_always_half() {
        let (start, end) = (date("2024-06-03"), date("2024-06-07"));
        assert_eq!(
            Kind::HalfDay.day_count(start.coerce(), end.coerce()),
            Days::HALF,
        );
    }

    #[test]
    fn approves_in_order() {
        let (first, second) = (employee::Id::new(), employee::Id::new());
        let mut req = request(&[first, second]);
        let on = date("2024-06-01").coerce();

        assert!(req.awaits(first));
        assert!(!req.awaits(second));
        assert_eq!(
            req.decide(second, Decision::Approve, on, None),
            Err(DecisionError::EarlierStepPending),
        );

        req.decide(first, Decision::Approve, on, None).unwrap();
        assert_eq!(req.status, Status::Pending);
        assert_eq!(req.step_of(first).unwrap().decided_on, Some(on));
        assert!(req.awaits(second));

        req.decide(second, Decision::Approve, on, None).unwrap();
        assert_eq!(req.status, Status::Approved);
        assert_eq!(
            req.decide(second, Decision::Approve, on, None),
            Err(DecisionError::AlreadyDecided),
        );
    }

    #[test]
    fn rejection_completes_request() {
        let (first, second) = (employee::Id::new(), employee::Id::new());
        let mut req = request(&[first, second]);
        let on = date("2024-06-01").coerce();

        req.decide(
            first,
            Decision::Reject,
            on,
            Some(Reason::new("busy week").unwrap()),
        )
        .unwrap();
        assert_eq!(req.status, Status::Rejected);
        assert_eq!(req.step_of(first).unwrap().status, Status::Rejected);
        assert_eq!(req.rejection_reason, Reason::new("busy week"));
        assert_eq!(
            req.decide(second, Decision::Approve, on, None),
            Err(DecisionError::AlreadyDecided),
        );
    }

    #[test]
    fn stranger_cannot_decide() {
        let mut req = request(&[employee::Id::new()]);
        assert_eq!(
            req.decide(
                employee::Id::new(),
                Decision::Approve,
                date("2024-06-01").coerce(),
                None,
            ),
            Err(DecisionError::NotApprover),
        );
    }
}
