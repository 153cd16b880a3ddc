//! Tabular views of a roster.
//!
//! Records never leave the roster as entities when they are displayed: a
//! [`Pages`] iterator turns them into rows of plain strings laid out by a list
//! of [`Column`]s, one fixed-size page at a time.

use crate::record::{group_thousands, CrewRecord, Field, FieldError};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Pilot record id.
    Id,
    /// Given name.
    GivenName,
    /// Middle name.
    MiddleName,
    /// Surname.
    Surname,
    /// Crew member position code.
    Position,
    /// License number.
    LicenseNumber,
    /// Base (proficiency check) month.
    BaseMonth,
    /// LOFT month derived from the base month.
    LoftMonth,
    /// Total hours.
    TotalHours,
    /// PIC hours.
    PicHours,
    /// SIC hours.
    SicHours,
    /// Active or passive.
    Status,
}

impl Column {
    /// Header text for the column.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "PID",
            Self::GivenName => "First name",
            Self::MiddleName => "Middle name",
            Self::Surname => "Surname",
            Self::Position => "CM Pos",
            Self::LicenseNumber => "License",
            Self::BaseMonth => "PC",
            Self::LoftMonth => "LOFT",
            Self::TotalHours => "Hours",
            Self::PicHours => "PIC",
            Self::SicHours => "SIC",
            Self::Status => "Status",
        }
    }

    /// Lay out the columns for a roster that tracks the given optional fields.
    ///
    /// Mandatory fields always get a column; a tracked base month brings its
    /// LOFT month along.
    #[must_use]
    pub fn layout(tracked: &[Field]) -> Vec<Column> {
        let tracks = |field: Field| tracked.contains(&field);
        let mut columns = vec![Self::Id, Self::GivenName];
        if tracks(Field::MiddleName) {
            columns.push(Self::MiddleName);
        }
        columns.push(Self::Surname);
        if tracks(Field::Position) {
            columns.push(Self::Position);
        }
        if tracks(Field::LicenseNumber) {
            columns.push(Self::LicenseNumber);
        }
        if tracks(Field::BaseMonth) {
            columns.push(Self::BaseMonth);
            columns.push(Self::LoftMonth);
        }
        columns.push(Self::TotalHours);
        if tracks(Field::PicHours) {
            columns.push(Self::PicHours);
        }
        if tracks(Field::SicHours) {
            columns.push(Self::SicHours);
        }
        if tracks(Field::Status) {
            columns.push(Self::Status);
        }
        columns
    }

    /// Render this column's cell for a record.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotPresent`] if the column reads an unset field.
    pub fn render(self, record: &CrewRecord) -> Result<String, FieldError> {
        Ok(match self {
            Self::Id => record.id().to_string(),
            Self::GivenName => record.given_name().to_string(),
            Self::MiddleName => record.middle_name()?.to_string(),
            Self::Surname => record.surname().to_string(),
            Self::Position => record.position()?.code().to_string(),
            Self::LicenseNumber => record.license_number()?.to_string(),
            Self::BaseMonth => record.base_month()?.label().to_string(),
            Self::LoftMonth => record.loft_month()?.label().to_string(),
            Self::TotalHours => group_thousands(record.total_hours()),
            Self::PicHours => group_thousands(record.pic_hours()?),
            Self::SicHours => group_thousands(record.sic_hours()?),
            Self::Status => record.status_label()?.to_string(),
        })
    }
}

/// Header labels for a column layout.
#[must_use]
pub fn headers(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|c| c.header()).collect()
}

/// Render one record as a row of cells.
///
/// # Errors
///
/// Returns [`FieldError::NotPresent`] if a column reads an unset field.
pub fn row(record: &CrewRecord, columns: &[Column]) -> Result<Vec<String>, FieldError> {
    columns.iter().map(|c| c.render(record)).collect()
}

/// One page of rendered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// One-based page number.
    pub number: usize,
    /// Total number of pages.
    pub total: usize,
    /// Rendered rows.
    pub rows: Vec<Vec<String>>,
}

impl Page {
    /// Check if this is the final page.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.number == self.total
    }
}

/// Lazy iterator over fixed-size pages of a record slice.
///
/// Rows are rendered only when a page is pulled. Cloning the iterator, or
/// asking the roster for a fresh one, restarts from the first page.
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    chunks: std::slice::Chunks<'a, CrewRecord>,
    columns: Vec<Column>,
    number: usize,
    total: usize,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(records: &'a [CrewRecord], columns: &[Column], page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            chunks: records.chunks(page_size),
            columns: columns.to_vec(),
            number: 0,
            total: records.len().div_ceil(page_size),
        }
    }

    /// Total number of pages.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<Page, FieldError>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        self.number += 1;
        let rows = chunk
            .iter()
            .map(|record| row(record, &self.columns))
            .collect::<Result<Vec<_>, _>>();
        Some(rows.map(|rows| Page {
            number: self.number,
            total: self.total,
            rows,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Pages<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, given: &str, surname: &str, hours: &str) -> CrewRecord {
        let mut record = CrewRecord::new(id);
        record.set_given_name(given);
        record.set_surname(surname);
        record.set_total_hours(hours).unwrap();
        record
    }

    fn records(count: u32) -> Vec<CrewRecord> {
        (1..=count)
            .map(|id| record(id, "pilot", "test", "1000"))
            .collect()
    }

    #[test]
    fn test_layout_defaults() {
        let columns = Column::layout(&[Field::Position, Field::BaseMonth]);
        assert_eq!(
            headers(&columns),
            vec!["PID", "First name", "Surname", "CM Pos", "PC", "LOFT", "Hours"]
        );
    }

    #[test]
    fn test_layout_mandatory_only() {
        let columns = Column::layout(&[]);
        assert_eq!(
            columns,
            vec![Column::Id, Column::GivenName, Column::Surname, Column::TotalHours]
        );
    }

    #[test]
    fn test_layout_everything() {
        let optional: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| !f.is_mandatory())
            .collect();
        assert_eq!(Column::layout(&optional).len(), 12);
    }

    #[test]
    fn test_row_rendering() {
        let mut pilot = record(4, "anne", "coughlan", "12345");
        pilot.set_position("1").unwrap();
        pilot.set_base_month("8").unwrap();
        let columns = Column::layout(&[Field::Position, Field::BaseMonth]);
        assert_eq!(
            row(&pilot, &columns).unwrap(),
            vec!["4", "Anne", "Coughlan", "FO", "Sep", "Mar", "12,345"]
        );
    }

    #[test]
    fn test_row_with_unset_column_fails() {
        let mut pilot = record(4, "anne", "coughlan", "2345");
        pilot.unset(Field::Position).unwrap();
        let err = row(&pilot, &[Column::Id, Column::Position]).unwrap_err();
        assert_eq!(err, FieldError::NotPresent(Field::Position));
    }

    #[test]
    fn test_pages_split() {
        let all = records(23);
        let pages: Vec<Page> = Pages::new(&all, &Column::layout(&[]), 10)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].rows.len(), 10);
        assert_eq!(pages[2].rows.len(), 3);
        assert_eq!(pages[2].number, 3);
        assert!(pages[2].is_last());
        assert!(!pages[0].is_last());
        assert_eq!(pages[1].rows[0][0], "11");
    }

    #[test]
    fn test_pages_exact_multiple() {
        let all = records(20);
        let pages = Pages::new(&all, &Column::layout(&[]), 10);
        assert_eq!(pages.total(), 2);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_pages_restart_by_clone() {
        let all = records(5);
        let mut pages = Pages::new(&all, &Column::layout(&[]), 2);
        let fresh = pages.clone();
        pages.next();
        pages.next();
        assert_eq!(pages.count(), 1);
        assert_eq!(fresh.count(), 3);
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let all = records(3);
        assert_eq!(Pages::new(&all, &Column::layout(&[]), 0).total(), 3);
    }
}
