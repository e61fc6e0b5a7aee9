//! [`Employee`] definitions.

use std::sync::LazyLock;

use common::{unit, DateOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee whose leave is tracked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Employee {
    /// ID of this [`Employee`].
    pub id: Id,

    /// [`Username`] of this [`Employee`].
    pub username: Username,

    /// [`Department`] this [`Employee`] works in, if known.
    pub department: Option<Department>,

    /// [`Position`] this [`Employee`] holds, if known.
    pub position: Option<Position>,

    /// [`HireDate`] of this [`Employee`].
    ///
    /// [`None`] means the date was never filled in, so no leave accrues.
    pub hire_date: Option<HireDate>,
}

/// ID of an [`Employee`].
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

/// Date an [`Employee`] was hired on.
pub type HireDate = DateOf<unit::Hiring>;

/// Username of an [`Employee`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Username`] invariants:
        /// - Must not be empty;
        /// - Must consist of letters, digits and `@`, `.`, `+`, `-`, `_`;
        /// - Must be at most 150 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[\w.@+-]{1,150}$").expect("valid regex")
        });

        REGEX.is_match(username.as_ref())
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

/// Department an [`Employee`] works in.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Department(String);

impl Department {
    /// Creates a new [`Department`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        check_label(&name).then_some(Self(name))
    }
}

impl FromStr for Department {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Department`")
    }
}

/// Position an [`Employee`] holds.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Position(String);

impl Position {
    /// Creates a new [`Position`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        check_label(&name).then_some(Self(name))
    }
}

impl FromStr for Position {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Position`")
    }
}

/// Checks a short free-text label: trimmed, non-empty, at most 50 characters.
fn check_label(label: &str) -> bool {
    label.trim() == label && !label.is_empty() && label.chars().count() <= 50
}
