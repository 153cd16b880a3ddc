//! Crew record model.
//!
//! A [`CrewRecord`] is one pilot's training profile. Four fields are
//! mandatory (id, given name, surname, total hours) and always carry a value,
//! so a record can always render its one-line summary. Every other field is
//! an optional slot an airline may remove when it does not track that
//! attribute; touching a removed slot is reported as
//! [`FieldError::NotPresent`] rather than silently defaulted.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive numeric limits for a bounded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Lowest accepted value.
    pub min: u32,
    /// Highest accepted value.
    pub max: u32,
}

impl Bounds {
    /// Create bounds covering `min..=max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Check whether a value lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        u64::from(self.min) <= value && value <= u64::from(self.max)
    }
}

/// Career limits for total hours: the airline entry minimum up to a career maximum.
pub const TOTAL_HOURS: Bounds = Bounds::new(200, 55_000);

/// Limits for PIC and SIC hours.
pub const LOGGED_HOURS: Bounds = Bounds::new(0, 55_000);

/// Limits for a crew position index.
pub const POSITION_INDEX: Bounds = Bounds::new(0, 1);

/// Limits for a base month index.
pub const MONTH_INDEX: Bounds = Bounds::new(0, 11);

/// Whether a field can be removed from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always present; cannot be unset.
    Mandatory,
    /// May be unset when the airline does not track it.
    Optional,
}

/// Every field a crew record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Unique pilot record id.
    Id,
    /// Given name.
    GivenName,
    /// Middle name.
    MiddleName,
    /// Surname.
    Surname,
    /// Crew member position.
    Position,
    /// License number.
    LicenseNumber,
    /// Training base month (the LOFT month derives from it).
    BaseMonth,
    /// Total flight hours.
    TotalHours,
    /// Hours as pilot in command.
    PicHours,
    /// Hours as second in command.
    SicHours,
    /// Active or passive status.
    Status,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::GivenName,
        Field::MiddleName,
        Field::Surname,
        Field::Position,
        Field::LicenseNumber,
        Field::BaseMonth,
        Field::TotalHours,
        Field::PicHours,
        Field::SicHours,
        Field::Status,
    ];

    /// The schema entry for this field.
    #[must_use]
    pub const fn presence(self) -> Presence {
        match self {
            Self::Id | Self::GivenName | Self::Surname | Self::TotalHours => Presence::Mandatory,
            Self::MiddleName
            | Self::Position
            | Self::LicenseNumber
            | Self::BaseMonth
            | Self::PicHours
            | Self::SicHours
            | Self::Status => Presence::Optional,
        }
    }

    /// Check if the field can never be removed.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(self.presence(), Presence::Mandatory)
    }

    /// The snake case name used in config files and messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::GivenName => "given_name",
            Self::MiddleName => "middle_name",
            Self::Surname => "surname",
            Self::Position => "position",
            Self::LicenseNumber => "license_number",
            Self::BaseMonth => "base_month",
            Self::TotalHours => "total_hours",
            Self::PicHours => "pic_hours",
            Self::SicHours => "sic_hours",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by record fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The input was not a non-negative whole number.
    #[error("{field}: '{input}' is not a non-negative whole number")]
    NotANumber {
        /// Field being set.
        field: Field,
        /// The rejected input, trimmed.
        input: String,
    },

    /// The number was outside the field's limits.
    #[error("{field}: {value} is out of range ({min} to {max})")]
    OutOfRange {
        /// Field being set.
        field: Field,
        /// The rejected value.
        value: u64,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },

    /// The field was unset on this record.
    #[error("field not present: {0}")]
    NotPresent(Field),

    /// The field is mandatory and cannot be removed.
    #[error("field {0} is mandatory and cannot be removed")]
    Protected(Field),
}

impl FieldError {
    /// Check if this is an input validation failure the caller should re-prompt on.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::NotANumber { .. } | Self::OutOfRange { .. })
    }

    /// Check if the application touched a field against its own configuration.
    #[must_use]
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::NotPresent(_) | Self::Protected(_))
    }
}

/// Crew member position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Captain.
    #[default]
    Captain,
    /// First officer.
    FirstOfficer,
}

impl Position {
    /// Positions in index order.
    pub const ALL: [Position; 2] = [Position::Captain, Position::FirstOfficer];

    /// Look up a position by its index.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// The zero-based index of this position.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Captain => 0,
            Self::FirstOfficer => 1,
        }
    }

    /// Short crew member code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Captain => "CAP",
            Self::FirstOfficer => "FO",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Calendar month used for base and LOFT scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Month {
    #[default]
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Look up a month by its zero-based index.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// The zero-based index of this month.
    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Three letter label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }

    /// The LOFT month paired with this base month, six months away.
    #[must_use]
    pub fn loft(self) -> Self {
        let index = self.index();
        let loft = if index > 5 { index - 6 } else { index + 6 };
        Self::ALL[loft as usize]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse input as a non-negative whole number.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`FieldError::NotANumber`] for non-numeric or negative input.
pub fn validate_nonnegative_integer(field: Field, input: &str) -> Result<u64, FieldError> {
    let trimmed = input.trim();
    trimmed.parse::<u64>().map_err(|_| FieldError::NotANumber {
        field,
        input: trimmed.to_string(),
    })
}

/// Parse input as a whole number within `bounds`.
///
/// # Errors
///
/// Returns [`FieldError::NotANumber`] or [`FieldError::OutOfRange`].
pub fn validate_bounded(field: Field, input: &str, bounds: Bounds) -> Result<u32, FieldError> {
    let value = validate_nonnegative_integer(field, input)?;
    if !bounds.contains(value) {
        return Err(FieldError::OutOfRange {
            field,
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }
    // In range, so it fits.
    u32::try_from(value).map_err(|_| FieldError::OutOfRange {
        field,
        value,
        min: bounds.min,
        max: bounds.max,
    })
}

/// Trim and capitalize a name: first letter upper case, the rest lower case.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Format a number with comma thousands separators.
#[must_use]
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn present<T>(slot: Option<T>, field: Field) -> Result<T, FieldError> {
    slot.ok_or(FieldError::NotPresent(field))
}

fn present_mut<T>(slot: &mut Option<T>, field: Field) -> Result<&mut T, FieldError> {
    slot.as_mut().ok_or(FieldError::NotPresent(field))
}

/// One pilot's training profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRecord {
    id: u32,
    given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    middle_name: Option<String>,
    surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_month: Option<Month>,
    total_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pic_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sic_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
}

impl CrewRecord {
    /// Create a blank record with every field present.
    ///
    /// Names are empty, hours are zero, the position is captain, the base
    /// month is January and the pilot is active. The owner is expected to
    /// unset what it does not track and then fill in the rest.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            given_name: String::new(),
            middle_name: Some(String::new()),
            surname: String::new(),
            position: Some(Position::default()),
            license_number: Some(String::new()),
            base_month: Some(Month::default()),
            total_hours: 0,
            pic_hours: Some(0),
            sic_hours: Some(0),
            active: Some(true),
        }
    }

    // === Mandatory fields ===

    /// The unique pilot record id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The given name.
    #[must_use]
    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    /// Set the given name, trimmed and capitalized.
    pub fn set_given_name(&mut self, name: &str) {
        self.given_name = title_case(name);
    }

    /// The surname.
    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Set the surname, trimmed and capitalized.
    pub fn set_surname(&mut self, name: &str) {
        self.surname = title_case(name);
    }

    /// Total flight hours.
    #[must_use]
    pub fn total_hours(&self) -> u32 {
        self.total_hours
    }

    /// Set total hours from user input.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the input is not a number within
    /// [`TOTAL_HOURS`]; the stored value is left unchanged.
    pub fn set_total_hours(&mut self, input: &str) -> Result<u32, FieldError> {
        let hours = validate_bounded(Field::TotalHours, input, TOTAL_HOURS)?;
        self.total_hours = hours;
        Ok(hours)
    }

    // === Optional fields ===

    /// The middle name.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn middle_name(&self) -> Result<&str, FieldError> {
        present(self.middle_name.as_deref(), Field::MiddleName)
    }

    /// Set the middle name, trimmed and capitalized.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn set_middle_name(&mut self, name: &str) -> Result<(), FieldError> {
        *present_mut(&mut self.middle_name, Field::MiddleName)? = title_case(name);
        Ok(())
    }

    /// The crew member position.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn position(&self) -> Result<Position, FieldError> {
        present(self.position, Field::Position)
    }

    /// Set the position from an index (0 captain, 1 first officer).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset, or an
    /// invalid-input error for anything but 0 or 1.
    pub fn set_position(&mut self, input: &str) -> Result<Position, FieldError> {
        let slot = present_mut(&mut self.position, Field::Position)?;
        let index = validate_bounded(Field::Position, input, POSITION_INDEX)?;
        let position = Position::from_index(index).ok_or(FieldError::OutOfRange {
            field: Field::Position,
            value: u64::from(index),
            min: POSITION_INDEX.min,
            max: POSITION_INDEX.max,
        })?;
        *slot = position;
        Ok(position)
    }

    /// The license number.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn license_number(&self) -> Result<&str, FieldError> {
        present(self.license_number.as_deref(), Field::LicenseNumber)
    }

    /// Set the license number, trimmed and upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn set_license_number(&mut self, number: &str) -> Result<(), FieldError> {
        *present_mut(&mut self.license_number, Field::LicenseNumber)? =
            number.trim().to_uppercase();
        Ok(())
    }

    /// The training base month.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn base_month(&self) -> Result<Month, FieldError> {
        present(self.base_month, Field::BaseMonth)
    }

    /// The LOFT month, six months away from the base month.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] for the base month if it was unset.
    pub fn loft_month(&self) -> Result<Month, FieldError> {
        self.base_month().map(Month::loft)
    }

    /// Set the base month from a zero-based index.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset, or an
    /// invalid-input error for anything outside 0 to 11.
    pub fn set_base_month(&mut self, input: &str) -> Result<Month, FieldError> {
        let slot = present_mut(&mut self.base_month, Field::BaseMonth)?;
        let index = validate_bounded(Field::BaseMonth, input, MONTH_INDEX)?;
        let month = Month::from_index(index).ok_or(FieldError::OutOfRange {
            field: Field::BaseMonth,
            value: u64::from(index),
            min: MONTH_INDEX.min,
            max: MONTH_INDEX.max,
        })?;
        *slot = month;
        Ok(month)
    }

    /// Hours as pilot in command.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn pic_hours(&self) -> Result<u32, FieldError> {
        present(self.pic_hours, Field::PicHours)
    }

    /// Set PIC hours from user input.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset, or an
    /// invalid-input error outside [`LOGGED_HOURS`].
    pub fn set_pic_hours(&mut self, input: &str) -> Result<u32, FieldError> {
        let slot = present_mut(&mut self.pic_hours, Field::PicHours)?;
        *slot = validate_bounded(Field::PicHours, input, LOGGED_HOURS)?;
        Ok(*slot)
    }

    /// Hours as second in command.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn sic_hours(&self) -> Result<u32, FieldError> {
        present(self.sic_hours, Field::SicHours)
    }

    /// Set SIC hours from user input.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset, or an
    /// invalid-input error outside [`LOGGED_HOURS`].
    pub fn set_sic_hours(&mut self, input: &str) -> Result<u32, FieldError> {
        let slot = present_mut(&mut self.sic_hours, Field::SicHours)?;
        *slot = validate_bounded(Field::SicHours, input, LOGGED_HOURS)?;
        Ok(*slot)
    }

    /// Whether the pilot is active.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn is_active(&self) -> Result<bool, FieldError> {
        present(self.active, Field::Status)
    }

    /// The status as "Active" or "Passive".
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn status_label(&self) -> Result<&'static str, FieldError> {
        self.is_active()
            .map(|active| if active { "Active" } else { "Passive" })
    }

    /// Set the active status.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the field was unset.
    pub fn set_active(&mut self, active: bool) -> Result<(), FieldError> {
        *present_mut(&mut self.active, Field::Status)? = active;
        Ok(())
    }

    // === Presence ===

    /// Check whether a field currently carries a value.
    #[must_use]
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::Id | Field::GivenName | Field::Surname | Field::TotalHours => true,
            Field::MiddleName => self.middle_name.is_some(),
            Field::Position => self.position.is_some(),
            Field::LicenseNumber => self.license_number.is_some(),
            Field::BaseMonth => self.base_month.is_some(),
            Field::PicHours => self.pic_hours.is_some(),
            Field::SicHours => self.sic_hours.is_some(),
            Field::Status => self.active.is_some(),
        }
    }

    /// Remove an optional field from this record.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Protected`] for mandatory fields.
    pub fn unset(&mut self, field: Field) -> Result<(), FieldError> {
        if field.is_mandatory() {
            return Err(FieldError::Protected(field));
        }
        match field {
            Field::MiddleName => self.middle_name = None,
            Field::Position => self.position = None,
            Field::LicenseNumber => self.license_number = None,
            Field::BaseMonth => self.base_month = None,
            Field::PicHours => self.pic_hours = None,
            Field::SicHours => self.sic_hours = None,
            Field::Status => self.active = None,
            Field::Id | Field::GivenName | Field::Surname | Field::TotalHours => {}
        }
        Ok(())
    }

    /// Bring an unset field back with its blank value so it can be set again.
    ///
    /// Fields that are already present keep their value.
    pub fn restore(&mut self, field: Field) {
        match field {
            Field::MiddleName => {
                self.middle_name.get_or_insert_with(String::new);
            }
            Field::Position => {
                self.position.get_or_insert_with(Position::default);
            }
            Field::LicenseNumber => {
                self.license_number.get_or_insert_with(String::new);
            }
            Field::BaseMonth => {
                self.base_month.get_or_insert_with(Month::default);
            }
            Field::PicHours => {
                self.pic_hours.get_or_insert(0);
            }
            Field::SicHours => {
                self.sic_hours.get_or_insert(0);
            }
            Field::Status => {
                self.active.get_or_insert(true);
            }
            Field::Id | Field::GivenName | Field::Surname | Field::TotalHours => {}
        }
    }

    // === Queries ===

    /// Check that PIC and SIC hours, alone or together, do not exceed total hours.
    ///
    /// Unset hour fields are left out of the sum.
    #[must_use]
    pub fn check_hours_integrity(&self) -> bool {
        let logged =
            u64::from(self.pic_hours.unwrap_or(0)) + u64::from(self.sic_hours.unwrap_or(0));
        logged <= u64::from(self.total_hours)
    }

    /// One line summary built from the mandatory fields only.
    #[must_use]
    pub fn render_summary(&self) -> String {
        format!(
            "Pilot record ID {} is {} {}, with {} hours (total)",
            self.id,
            self.given_name,
            self.surname,
            group_thousands(self.total_hours)
        )
    }
}

impl fmt::Display for CrewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_summary())
    }
}
