//! The in-memory roster of crew records.
//!
//! A [`Roster`] owns the records in insertion order together with its two
//! counters: `next_id`, the last pilot id handed out, and `live_count`, the
//! number of records currently held. Ids only ever grow. Deleting a record
//! leaves a permanent gap in the id sequence, which marks a pilot who has
//! left the company.
//!
//! Adding and deleting are two-phase: the roster stages the change and hands
//! back a guard ([`PendingAdd`], [`PendingDelete`]) so the caller can show the
//! record and ask for confirmation before anything is committed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{CrewRecord, Field, FieldError, LOGGED_HOURS, TOTAL_HOURS};
use crate::view::{Column, Pages};

/// Default number of pilot ids a roster may hand out.
pub const DEFAULT_CAPACITY: u32 = 200;

/// Highest capacity a roster can be configured with.
pub const HARD_CAPACITY: u32 = 9_999;

/// The fields a new pilot is created with.
///
/// Numeric fields hold raw user input and are validated when the record is
/// built. Optional fields left as `None` are unset on the new record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewDraft {
    /// Given name.
    pub given_name: String,
    /// Surname.
    pub surname: String,
    /// Total hours.
    pub total_hours: String,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Position index (0 captain, 1 first officer).
    pub position: Option<String>,
    /// License number.
    pub license_number: Option<String>,
    /// Base month index (0 to 11).
    pub base_month: Option<String>,
    /// PIC hours.
    pub pic_hours: Option<String>,
    /// SIC hours.
    pub sic_hours: Option<String>,
    /// Active status.
    pub active: Option<bool>,
}

impl CrewDraft {
    /// Start a draft with the mandatory fields.
    #[must_use]
    pub fn new(
        given_name: impl Into<String>,
        surname: impl Into<String>,
        total_hours: impl Into<String>,
    ) -> Self {
        Self {
            given_name: given_name.into(),
            surname: surname.into(),
            total_hours: total_hours.into(),
            ..Self::default()
        }
    }

    /// Build a record with this draft's fields under the given id.
    ///
    /// # Errors
    ///
    /// Returns the first field that rejects its input.
    pub fn build(&self, id: u32) -> std::result::Result<CrewRecord, FieldError> {
        let mut record = CrewRecord::new(id);
        let supplied = [
            (Field::MiddleName, self.middle_name.is_some()),
            (Field::Position, self.position.is_some()),
            (Field::LicenseNumber, self.license_number.is_some()),
            (Field::BaseMonth, self.base_month.is_some()),
            (Field::PicHours, self.pic_hours.is_some()),
            (Field::SicHours, self.sic_hours.is_some()),
            (Field::Status, self.active.is_some()),
        ];
        for (field, present) in supplied {
            if !present {
                record.unset(field)?;
            }
        }

        record.set_given_name(&self.given_name);
        record.set_surname(&self.surname);
        record.set_total_hours(&self.total_hours)?;
        if let Some(name) = &self.middle_name {
            record.set_middle_name(name)?;
        }
        if let Some(position) = &self.position {
            record.set_position(position)?;
        }
        if let Some(number) = &self.license_number {
            record.set_license_number(number)?;
        }
        if let Some(month) = &self.base_month {
            record.set_base_month(month)?;
        }
        if let Some(hours) = &self.pic_hours {
            record.set_pic_hours(hours)?;
        }
        if let Some(hours) = &self.sic_hours {
            record.set_sic_hours(hours)?;
        }
        if let Some(active) = self.active {
            record.set_active(active)?;
        }
        Ok(record)
    }
}

/// A group of fields edited together.
///
/// Either every field in the group takes its new value or none does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldGroup {
    /// Given name and surname.
    Name {
        /// New given name.
        given_name: String,
        /// New surname.
        surname: String,
    },
    /// Crew position index.
    Position(String),
    /// Base month index; the LOFT month follows it.
    Months(String),
    /// Total hours, plus PIC and SIC hours where the roster tracks them.
    Hours {
        /// New total hours.
        total_hours: String,
        /// New PIC hours.
        pic_hours: Option<String>,
        /// New SIC hours.
        sic_hours: Option<String>,
    },
}

impl FieldGroup {
    fn apply(&self, record: &mut CrewRecord) -> std::result::Result<(), FieldError> {
        match self {
            Self::Name {
                given_name,
                surname,
            } => {
                record.set_given_name(given_name);
                record.set_surname(surname);
            }
            Self::Position(position) => {
                record.set_position(position)?;
            }
            Self::Months(month) => {
                record.set_base_month(month)?;
            }
            Self::Hours {
                total_hours,
                pic_hours,
                sic_hours,
            } => {
                record.set_total_hours(total_hours)?;
                if let Some(hours) = pic_hours {
                    record.set_pic_hours(hours)?;
                }
                if let Some(hours) = sic_hours {
                    record.set_sic_hours(hours)?;
                }
            }
        }
        Ok(())
    }
}

/// The id and live counters of a roster, as saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters(pub u32, pub u32);

impl Counters {
    /// Last pilot id handed out.
    #[must_use]
    pub fn next_id(self) -> u32 {
        self.0
    }

    /// Number of records held.
    #[must_use]
    pub fn live_count(self) -> u32 {
        self.1
    }
}

/// A roster in its saved shape: `[[next_id, live_count], [record, ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRoster(pub Counters, pub Vec<CrewRecord>);

impl SavedRoster {
    /// The saved counters.
    #[must_use]
    pub fn counters(&self) -> Counters {
        self.0
    }

    /// The saved records, in roster order.
    #[must_use]
    pub fn records(&self) -> &[CrewRecord] {
        &self.1
    }

    /// Check the saved contents against the roster invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn check(&self) -> std::result::Result<(), String> {
        let Counters(next_id, live_count) = self.0;
        if next_id > HARD_CAPACITY {
            return Err(format!(
                "id counter {next_id} exceeds the hard capacity {HARD_CAPACITY}"
            ));
        }
        if usize::try_from(live_count).ok() != Some(self.1.len()) {
            return Err(format!(
                "live count {live_count} does not match {} records",
                self.1.len()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for record in &self.1 {
            let id = record.id();
            if id == 0 || id > next_id {
                return Err(format!("record id {id} outside 1..={next_id}"));
            }
            if !seen.insert(id) {
                return Err(format!("duplicate record id {id}"));
            }
            if !TOTAL_HOURS.contains(u64::from(record.total_hours())) {
                return Err(format!(
                    "record id {id} has {} total hours",
                    record.total_hours()
                ));
            }
            for (field, hours) in [
                (Field::PicHours, record.pic_hours()),
                (Field::SicHours, record.sic_hours()),
            ] {
                if let Ok(hours) = hours {
                    if !LOGGED_HOURS.contains(u64::from(hours)) {
                        return Err(format!("record id {id} has {hours} {field}"));
                    }
                }
            }
            if record.given_name().trim().is_empty() || record.surname().trim().is_empty() {
                return Err(format!("record id {id} is missing a name"));
            }
        }
        Ok(())
    }
}

/// The in-memory roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    records: Vec<CrewRecord>,
    next_id: u32,
    live_count: u32,
    capacity: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Roster {
    /// Create an empty roster that can hand out up to `capacity` ids.
    ///
    /// The capacity is clamped to `1..=HARD_CAPACITY`.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            records: Vec::new(),
            next_id: 0,
            live_count: 0,
            capacity: capacity.clamp(1, HARD_CAPACITY),
        }
    }

    /// The last pilot id handed out.
    #[must_use]
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Number of records currently held.
    #[must_use]
    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    /// Maximum id this roster will hand out.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[CrewRecord] {
        &self.records
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the roster holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if every pilot id up to the capacity has been handed out.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.next_id >= self.capacity
    }

    /// Check if there is anything for [`Roster::reset`] to clear.
    #[must_use]
    pub fn is_resettable(&self) -> bool {
        !self.records.is_empty() && self.next_id > 0 && self.live_count > 0
    }

    /// Stage a new pilot.
    ///
    /// The draft is validated before an id is taken, so a rejected draft
    /// never leaves a gap. The returned guard holds the record until it is
    /// committed; rejecting or dropping it gives the id back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityReached`] when every id is used, or the field
    /// error of an invalid draft. Neither changes the roster.
    pub fn begin_add(&mut self, draft: &CrewDraft) -> Result<PendingAdd<'_>> {
        if self.is_full() {
            warn!(capacity = self.capacity, "roster capacity reached");
            return Err(Error::CapacityReached {
                capacity: self.capacity,
            });
        }
        let record = draft.build(self.next_id + 1)?;
        self.next_id += 1;
        debug!(id = self.next_id, "staged new pilot");
        Ok(PendingAdd {
            roster: self,
            record,
            committed: false,
        })
    }

    /// Find a record by pilot id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has the id.
    pub fn find_by_id(&self, id: u32) -> Result<&CrewRecord> {
        self.records
            .iter()
            .find(|record| record.id() == id)
            .ok_or(Error::RecordNotFound { id })
    }

    fn position_of(&self, id: u32) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(Error::RecordNotFound { id })
    }

    /// Apply a field group to a record.
    ///
    /// The group is applied to a copy which replaces the record only when
    /// every field accepted its input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] or the first field error; in both
    /// cases the record is unchanged.
    pub fn edit(&mut self, id: u32, group: &FieldGroup) -> Result<&CrewRecord> {
        let index = self.position_of(id)?;
        let mut edited = self.records[index].clone();
        group.apply(&mut edited)?;
        if !edited.check_hours_integrity() {
            warn!(id, "hours integrity violated after edit");
        }
        debug!(id, ?group, "edited pilot");
        self.records[index] = edited;
        Ok(&self.records[index])
    }

    /// Stage a record for deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has the id.
    pub fn begin_delete(&mut self, id: u32) -> Result<PendingDelete<'_>> {
        let index = self.position_of(id)?;
        Ok(PendingDelete {
            roster: self,
            index,
        })
    }

    /// Lazily page through the roster as rows of plain text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRoster`] instead of an empty sequence.
    pub fn pages(&self, columns: &[Column], page_size: usize) -> Result<Pages<'_>> {
        if self.records.is_empty() {
            return Err(Error::EmptyRoster);
        }
        Ok(Pages::new(&self.records, columns, page_size))
    }

    /// Ids of records whose hours fail the integrity check.
    #[must_use]
    pub fn integrity_violations(&self) -> Vec<u32> {
        self.records
            .iter()
            .filter(|record| !record.check_hours_integrity())
            .map(CrewRecord::id)
            .collect()
    }

    /// Clear every record and both counters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToReset`] if the roster is already empty or
    /// either counter is already zero.
    pub fn reset(&mut self) -> Result<()> {
        if !self.is_resettable() {
            return Err(Error::NothingToReset);
        }
        self.records.clear();
        self.next_id = 0;
        self.live_count = 0;
        debug!("roster reset");
        Ok(())
    }

    /// Capture the roster in its saved shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToSave`] if the roster is empty.
    pub fn snapshot(&self) -> Result<SavedRoster> {
        if self.records.is_empty() {
            return Err(Error::NothingToSave);
        }
        Ok(SavedRoster(
            Counters(self.next_id, self.live_count),
            self.records.clone(),
        ))
    }

    /// Replace the records and both counters with a saved roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRoster`] if the saved contents break a
    /// roster invariant; the roster is left untouched.
    pub fn restore(&mut self, saved: SavedRoster, source: &std::path::Path) -> Result<()> {
        saved
            .check()
            .map_err(|message| Error::malformed(source, message))?;
        let SavedRoster(Counters(next_id, live_count), records) = saved;
        self.records = records;
        self.next_id = next_id;
        self.live_count = live_count;
        debug!(next_id, live_count, "roster restored");
        Ok(())
    }
}

/// A staged pilot waiting for confirmation.
///
/// Dropping the guard without committing rolls the id counter back by one.
#[derive(Debug)]
#[must_use = "a staged pilot is discarded unless committed"]
pub struct PendingAdd<'a> {
    roster: &'a mut Roster,
    record: CrewRecord,
    committed: bool,
}

impl PendingAdd<'_> {
    /// The staged record.
    #[must_use]
    pub fn record(&self) -> &CrewRecord {
        &self.record
    }

    /// Append the record to the roster and return its id.
    pub fn commit(mut self) -> u32 {
        let id = self.record.id();
        self.roster.records.push(self.record.clone());
        self.roster.live_count += 1;
        self.committed = true;
        debug!(id, "pilot added");
        id
    }

    /// Discard the record and give its id back.
    pub fn reject(self) {}
}

impl Drop for PendingAdd<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.roster.next_id -= 1;
            debug!(id = self.record.id(), "staged pilot rejected");
        }
    }
}

/// A record staged for deletion.
#[derive(Debug)]
#[must_use = "a staged deletion does nothing unless committed"]
pub struct PendingDelete<'a> {
    roster: &'a mut Roster,
    index: usize,
}

impl PendingDelete<'_> {
    /// The record that would be deleted.
    #[must_use]
    pub fn record(&self) -> &CrewRecord {
        &self.roster.records[self.index]
    }

    /// Remove the record from the roster and return it.
    pub fn commit(self) -> CrewRecord {
        let record = self.roster.records.remove(self.index);
        self.roster.live_count = self.roster.live_count.saturating_sub(1);
        debug!(id = record.id(), "pilot deleted");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Month;
    use std::path::Path;

    fn draft(given: &str, surname: &str, hours: &str) -> CrewDraft {
        CrewDraft {
            position: Some("0".to_string()),
            base_month: Some("3".to_string()),
            ..CrewDraft::new(given, surname, hours)
        }
    }

    fn add(roster: &mut Roster, d: &CrewDraft) -> u32 {
        roster.begin_add(d).unwrap().commit()
    }

    fn roster_with(count: u32) -> Roster {
        let mut roster = Roster::default();
        for i in 0..count {
            add(&mut roster, &draft("pilot", "number", &(1000 + i).to_string()));
        }
        roster
    }

    #[test]
    fn test_new_roster_is_empty() {
        let roster = Roster::default();
        assert!(roster.is_empty());
        assert_eq!(roster.next_id(), 0);
        assert_eq!(roster.live_count(), 0);
        assert_eq!(roster.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_capacity_is_clamped() {
        assert_eq!(Roster::new(0).capacity(), 1);
        assert_eq!(Roster::new(u32::MAX).capacity(), HARD_CAPACITY);
    }

    #[test]
    fn test_draft_build_unsets_missing_fields() {
        let record = draft("anne", "coughlan", "2345").build(5).unwrap();
        assert_eq!(record.id(), 5);
        assert_eq!(record.given_name(), "Anne");
        assert_eq!(record.base_month().unwrap(), Month::Apr);
        assert_eq!(record.loft_month().unwrap(), Month::Oct);
        assert!(!record.is_present(Field::MiddleName));
        assert!(!record.is_present(Field::PicHours));
        assert!(!record.is_present(Field::Status));
        assert!(record.is_present(Field::Position));
    }

    #[test]
    fn test_add_commit() {
        let mut roster = Roster::default();
        let pending = roster.begin_add(&draft("fred", "greg", "4567")).unwrap();
        assert_eq!(pending.record().id(), 1);
        assert_eq!(pending.commit(), 1);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.next_id(), 1);
        assert_eq!(roster.live_count(), 1);
    }

    #[test]
    fn test_add_reject_rolls_back_id() {
        let mut roster = roster_with(2);
        roster
            .begin_add(&draft("fred", "greg", "4567"))
            .unwrap()
            .reject();
        assert_eq!(roster.next_id(), 2);
        assert_eq!(roster.live_count(), 2);

        {
            let _dropped = roster.begin_add(&draft("fred", "greg", "4567")).unwrap();
        }
        assert_eq!(roster.next_id(), 2);
        assert_eq!(add(&mut roster, &draft("fred", "greg", "4567")), 3);
    }

    #[test]
    fn test_invalid_draft_consumes_no_id() {
        let mut roster = Roster::default();
        assert_eq!(add(&mut roster, &draft("a", "one", "4000")), 1);

        let err = roster.begin_add(&draft("b", "two", "99999")).unwrap_err();
        assert!(matches!(err, Error::Field(ref e) if e.is_invalid()));
        assert_eq!(roster.next_id(), 1);

        assert_eq!(add(&mut roster, &draft("b", "two", "2345")), 2);
        assert_eq!(roster.live_count(), 2);
        let ids: Vec<u32> = roster.records().iter().map(CrewRecord::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_capacity_rejects_add() {
        let mut roster = Roster::new(3);
        for _ in 0..3 {
            add(&mut roster, &draft("x", "y", "500"));
        }
        let err = roster.begin_add(&draft("x", "y", "500")).unwrap_err();
        assert!(matches!(err, Error::CapacityReached { capacity: 3 }));
        assert_eq!(roster.next_id(), 3);
    }

    #[test]
    fn test_capacity_counts_ids_not_live_records() {
        let mut roster = Roster::default();
        for _ in 0..DEFAULT_CAPACITY {
            add(&mut roster, &draft("x", "y", "500"));
        }
        roster.begin_delete(7).unwrap().commit();
        assert_eq!(roster.live_count(), DEFAULT_CAPACITY - 1);

        assert!(roster.begin_add(&draft("x", "y", "500")).is_err());
        assert_eq!(roster.next_id(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_find_by_id() {
        let roster = roster_with(3);
        assert_eq!(roster.find_by_id(2).unwrap().total_hours(), 1001);
        assert!(roster.find_by_id(9).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_keeps_id_counter() {
        let mut roster = roster_with(3);
        let pending = roster.begin_delete(2).unwrap();
        assert_eq!(pending.record().id(), 2);
        let removed = pending.commit();
        assert_eq!(removed.id(), 2);

        assert_eq!(roster.next_id(), 3);
        assert_eq!(roster.live_count(), 2);
        assert_eq!(add(&mut roster, &draft("new", "pilot", "800")), 4);
        let ids: Vec<u32> = roster.records().iter().map(CrewRecord::id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_delete_not_committed_changes_nothing() {
        let mut roster = roster_with(2);
        let before = roster.clone();
        let _ = roster.begin_delete(1).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn test_delete_missing_id() {
        let mut roster = roster_with(1);
        assert!(roster.begin_delete(5).unwrap_err().is_not_found());
        assert_eq!(roster.live_count(), 1);
    }

    #[test]
    fn test_edit_name_group() {
        let mut roster = roster_with(1);
        let group = FieldGroup::Name {
            given_name: "william".to_string(),
            surname: "SHEARER".to_string(),
        };
        let edited = roster.edit(1, &group).unwrap();
        assert_eq!(edited.given_name(), "William");
        assert_eq!(edited.surname(), "Shearer");
    }

    #[test]
    fn test_edit_months_moves_loft() {
        let mut roster = roster_with(1);
        roster.edit(1, &FieldGroup::Months("9".to_string())).unwrap();
        let record = roster.find_by_id(1).unwrap();
        assert_eq!(record.base_month().unwrap(), Month::Oct);
        assert_eq!(record.loft_month().unwrap(), Month::Apr);
    }

    #[test]
    fn test_edit_group_is_atomic() {
        let mut roster = Roster::default();
        let with_hours = CrewDraft {
            pic_hours: Some("1000".to_string()),
            sic_hours: Some("500".to_string()),
            ..draft("anne", "coughlan", "2345")
        };
        add(&mut roster, &with_hours);
        let before = roster.clone();

        let group = FieldGroup::Hours {
            total_hours: "3000".to_string(),
            pic_hours: Some("1200".to_string()),
            sic_hours: Some("not hours".to_string()),
        };
        assert!(roster.edit(1, &group).is_err());
        assert_eq!(roster, before);
    }

    #[test]
    fn test_edit_below_pic_hours_breaks_integrity() {
        let mut roster = Roster::default();
        let with_pic = CrewDraft {
            pic_hours: Some("1500".to_string()),
            ..draft("anne", "coughlan", "2345")
        };
        add(&mut roster, &with_pic);
        assert!(roster.integrity_violations().is_empty());

        let group = FieldGroup::Hours {
            total_hours: "1000".to_string(),
            pic_hours: None,
            sic_hours: None,
        };
        let edited = roster.edit(1, &group).unwrap();
        assert!(!edited.check_hours_integrity());
        assert_eq!(edited.total_hours(), 1000);
        assert_eq!(edited.pic_hours().unwrap(), 1500);
        assert_eq!(roster.integrity_violations(), vec![1]);
    }

    #[test]
    fn test_edit_unset_group_is_programmer_error() {
        let mut roster = Roster::default();
        add(&mut roster, &CrewDraft::new("fred", "greg", "4567"));
        let err = roster
            .edit(1, &FieldGroup::Position("1".to_string()))
            .unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_edit_missing_id() {
        let mut roster = roster_with(1);
        let err = roster
            .edit(3, &FieldGroup::Months("1".to_string()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pages_empty_roster() {
        let roster = Roster::default();
        assert!(matches!(
            roster.pages(&Column::layout(&[]), 10),
            Err(Error::EmptyRoster)
        ));
    }

    #[test]
    fn test_pages_follow_insertion_order() {
        let mut roster = roster_with(3);
        roster.begin_delete(1).unwrap().commit();
        add(&mut roster, &draft("late", "comer", "300"));
        let page = roster
            .pages(&[Column::Id], 10)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(page.rows, vec![vec!["2"], vec!["3"], vec!["4"]]);
    }

    #[test]
    fn test_reset() {
        let mut roster = roster_with(3);
        roster.reset().unwrap();
        assert!(roster.is_empty());
        assert_eq!(roster.next_id(), 0);
        assert_eq!(roster.live_count(), 0);
        assert!(matches!(roster.reset(), Err(Error::NothingToReset)));
    }

    #[test]
    fn test_reset_empty_roster_refused() {
        let mut roster = Roster::default();
        assert!(matches!(roster.reset(), Err(Error::NothingToReset)));
    }

    #[test]
    fn test_snapshot_empty_roster() {
        assert!(matches!(
            Roster::default().snapshot(),
            Err(Error::NothingToSave)
        ));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut roster = roster_with(4);
        roster.begin_delete(3).unwrap().commit();
        let saved = roster.snapshot().unwrap();
        assert_eq!(saved.counters(), Counters(4, 3));

        let mut other = Roster::default();
        other.restore(saved, Path::new("mem")).unwrap();
        assert_eq!(other.records(), roster.records());
        assert_eq!(other.next_id(), 4);
        assert_eq!(other.live_count(), 3);
    }

    #[test]
    fn test_saved_shape() {
        let roster = roster_with(1);
        let json = serde_json::to_value(roster.snapshot().unwrap()).unwrap();
        assert_eq!(json[0], serde_json::json!([1, 1]));
        assert_eq!(json[1][0]["id"], 1);
        assert_eq!(json[1][0]["given_name"], "Pilot");
    }

    #[test]
    fn test_restore_rejects_inconsistent_counters() {
        let roster = roster_with(2);
        let SavedRoster(_, records) = roster.snapshot().unwrap();

        let mut target = roster_with(1);
        let before = target.clone();

        for counters in [Counters(2, 5), Counters(1, 2)] {
            let err = target
                .restore(SavedRoster(counters, records.clone()), Path::new("bad.dpb"))
                .unwrap_err();
            assert!(matches!(err, Error::MalformedRoster { .. }));
            assert_eq!(target, before);
        }
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let roster = roster_with(1);
        let SavedRoster(_, mut records) = roster.snapshot().unwrap();
        records.push(records[0].clone());
        let mut target = Roster::default();
        let err = target
            .restore(SavedRoster(Counters(1, 2), records), Path::new("dup.dpb"))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
        assert!(target.is_empty());
    }
}
