//! Interactive roster session.
//!
//! [`App`] runs the main menu: each choice moves from idle into one workflow
//! (adding, viewing, editing, deleting, loading, resetting, saving) and back.
//! Errors a user can cause are shown and the menu comes back; errors that
//! mean the program misused its own records end the session.

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::console::Console;
use crate::error::{Error, Result};
use crate::record::{Bounds, Field, Month, Position, LOGGED_HOURS, TOTAL_HOURS};
use crate::roster::{CrewDraft, FieldGroup, Roster};
use crate::storage::RosterStore;
use crate::view::{self, Column};

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    /// Add a pilot.
    Add,
    /// Page through the roster.
    View,
    /// Edit a pilot.
    Edit,
    /// Delete a pilot.
    Delete,
    /// Load a saved roster.
    Load,
    /// Clear the roster and its counters.
    Reset,
    /// Save the roster.
    Save,
    /// Leave the program.
    Exit,
}

impl MainAction {
    /// Menu entries in display order.
    pub const ALL: [MainAction; 8] = [
        MainAction::Add,
        MainAction::View,
        MainAction::Edit,
        MainAction::Delete,
        MainAction::Load,
        MainAction::Reset,
        MainAction::Save,
        MainAction::Exit,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add a pilot",
            Self::View => "View pilots",
            Self::Edit => "Edit a pilot",
            Self::Delete => "Delete a pilot",
            Self::Load => "Load a roster",
            Self::Reset => "Clear current roster (reset)",
            Self::Save => "Save current roster",
            Self::Exit => "Exit program",
        }
    }

    /// The entry for a one-based menu choice.
    #[must_use]
    pub fn from_choice(choice: u32) -> Option<Self> {
        let index = usize::try_from(choice.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }
}

/// Entries of the edit submenu, one per field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Given name and surname.
    Name,
    /// Crew position.
    Position,
    /// Base and LOFT months.
    Months,
    /// Hours.
    Hours,
}

impl EditAction {
    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Edit name",
            Self::Position => "Edit position",
            Self::Months => "Edit base month",
            Self::Hours => "Edit hours",
        }
    }
}

const EXIT_EDIT: &str = "Exit edit";

fn menu_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// An interactive roster session.
#[derive(Debug)]
pub struct App<C> {
    console: C,
    config: Config,
    roster: Roster,
    store: RosterStore,
    columns: Vec<Column>,
}

impl<C: Console> App<C> {
    /// Create a session with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured roster store is invalid.
    pub fn new(config: Config, console: C) -> Result<Self> {
        let store = config.roster_store()?;
        let columns = Column::layout(&config.roster.tracked_fields);
        Ok(Self {
            console,
            roster: Roster::new(config.roster.capacity),
            config,
            store,
            columns,
        })
    }

    /// The roster held by this session.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Consume the session and return its console.
    pub fn into_console(self) -> C {
        self.console
    }

    /// Run the main menu until the user exits.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not recoverable, such as closed input
    /// or a read of a field the roster does not track.
    pub fn run(&mut self) -> Result<()> {
        let labels: Vec<&str> = MainAction::ALL.iter().map(|a| a.label()).collect();
        loop {
            self.console.banner("MAIN MENU")?;
            self.console.render_menu(&labels)?;
            let choice = self
                .console
                .read_bounded_integer("Select: ", 1, menu_len(labels.len()))?;
            let Some(action) = MainAction::from_choice(choice) else {
                continue;
            };
            if action == MainAction::Exit {
                debug!("session ended by user");
                return Ok(());
            }

            if let Err(err) = self.perform(action) {
                if !err.is_recoverable() {
                    error!(%err, ?action, "unrecoverable error");
                    return Err(err);
                }
                warn!(%err, ?action, "operation failed");
                self.console.show(&err.to_string())?;
                self.console.pause()?;
            }
        }
    }

    /// Run one main menu workflow.
    ///
    /// # Errors
    ///
    /// Returns whatever the workflow fails with.
    pub fn perform(&mut self, action: MainAction) -> Result<()> {
        debug!(?action, "menu action");
        match action {
            MainAction::Add => self.add_pilot(),
            MainAction::View => self.view_pilots(),
            MainAction::Edit => self.edit_pilot(),
            MainAction::Delete => self.delete_pilot(),
            MainAction::Load => self.load_roster(),
            MainAction::Reset => self.reset_roster(),
            MainAction::Save => self.save_roster(),
            MainAction::Exit => Ok(()),
        }
    }

    // === Workflows ===

    fn add_pilot(&mut self) -> Result<()> {
        self.console.banner("ADD PILOT")?;
        if self.roster.is_full() {
            return Err(Error::CapacityReached {
                capacity: self.roster.capacity(),
            });
        }
        let draft = self.read_draft()?;

        let pending = self.roster.begin_add(&draft)?;
        let row = view::row(pending.record(), &self.columns)?;
        let intact = pending.record().check_hours_integrity();

        self.console.banner("ADD PILOT")?;
        self.console
            .render_table(&view::headers(&self.columns), &[row])?;
        if !intact {
            self.console
                .show("WARNING: PIC and SIC hours exceed the total hours.")?;
        }
        self.console.show("Is this data correct?")?;
        if self.console.read_yes_no()? {
            pending.commit();
            self.console.show("PILOT ENTERED.")?;
        } else {
            pending.reject();
            self.console.show("ABORTED.")?;
        }
        Ok(())
    }

    fn view_pilots(&mut self) -> Result<()> {
        if self.roster.is_empty() {
            self.console.banner("VIEW PILOT(S)")?;
            self.console
                .show("No pilots entered into the roster. Cannot view.")?;
            self.console.show("Load a saved roster now?")?;
            if self.console.read_yes_no()? {
                return self.load_roster();
            }
            return Ok(());
        }

        let headers = view::headers(&self.columns);
        let pages = self
            .roster
            .pages(&self.columns, self.config.roster.page_size)?;
        debug!(pages = pages.total(), "viewing roster");
        for page in pages {
            let page = page?;
            self.console.banner("VIEW PILOT(S)")?;
            self.console.show(&format!(
                "Pilot count: {}    Current pid sequence: {}",
                self.roster.live_count(),
                self.roster.next_id()
            ))?;
            self.console.render_table(&headers, &page.rows)?;
            self.console
                .show(&format!("Page {} of {}", page.number, page.total))?;
            if page.is_last() {
                self.console.show("END OF ROSTER.")?;
            }
            self.console.pause()?;
        }
        Ok(())
    }

    fn edit_pilot(&mut self) -> Result<()> {
        self.console.banner("EDIT PILOT")?;
        if self.roster.is_empty() {
            return Err(Error::EmptyRoster);
        }
        let id = self.console.read_bounded_integer(
            "Enter Pilot ID (PID) of pilot to edit: ",
            1,
            self.roster.next_id(),
        )?;
        self.roster.find_by_id(id)?;

        let actions = self.edit_actions();
        let mut labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        labels.push(EXIT_EDIT);

        loop {
            self.console.banner("EDIT PILOT")?;
            let summary = self.roster.find_by_id(id)?.render_summary();
            self.console.show(&summary)?;
            self.console.render_menu(&labels)?;
            let choice = self
                .console
                .read_bounded_integer("Select: ", 1, menu_len(labels.len()))?;
            let Some(action) = usize::try_from(choice - 1)
                .ok()
                .and_then(|i| actions.get(i).copied())
            else {
                break;
            };

            let group = self.read_group(action)?;
            match self.roster.edit(id, &group) {
                Ok(record) => {
                    if !record.check_hours_integrity() {
                        self.console.show(&format!(
                            "WARNING: PIC and SIC hours now exceed the total hours of pilot {id}."
                        ))?;
                        self.console.pause()?;
                    }
                }
                Err(err) if err.is_recoverable() => {
                    self.console.show(&err.to_string())?;
                    self.console.pause()?;
                }
                Err(err) => return Err(err),
            }
        }
        self.console.show("END EDIT.")?;
        Ok(())
    }

    fn delete_pilot(&mut self) -> Result<()> {
        self.console.banner("DELETE A PILOT")?;
        if self.roster.is_empty() {
            return Err(Error::EmptyRoster);
        }
        let id = self.console.read_bounded_integer(
            "Select pilot ID to delete: ",
            1,
            self.roster.next_id(),
        )?;

        let pending = self.roster.begin_delete(id)?;
        let row = view::row(pending.record(), &self.columns)?;
        self.console
            .render_table(&view::headers(&self.columns), &[row])?;
        self.console.show("Delete this pilot?")?;
        if self.console.read_yes_no()? {
            pending.commit();
            self.console.show("PILOT DELETED.")?;
        } else {
            self.console.show("ABORTED.")?;
        }
        Ok(())
    }

    fn load_roster(&mut self) -> Result<()> {
        self.console.banner("LOAD A ROSTER")?;
        let files = self.store.list()?;
        if files.is_empty() {
            return Err(Error::NoSavedRosters {
                dir: self.store.dir().to_path_buf(),
            });
        }

        let labels: Vec<&str> = files.iter().map(String::as_str).collect();
        self.console.render_menu(&labels)?;
        let choice = self.console.read_bounded_integer(
            "Choose the roster to load: ",
            1,
            menu_len(files.len()),
        )?;
        let Some(file) = usize::try_from(choice - 1).ok().and_then(|i| files.get(i)) else {
            return Ok(());
        };

        let saved = self.store.read(file)?;
        let path = self.store.dir().join(file);
        for record in saved.records() {
            if let Some(field) = self
                .config
                .roster
                .tracked_fields
                .iter()
                .find(|f| !record.is_present(**f))
            {
                return Err(Error::malformed(
                    path,
                    format!("pilot record ID {} has no {field}", record.id()),
                ));
            }
        }

        self.console
            .show("This will overwrite any existing roster. Continue?")?;
        if self.console.read_yes_no()? {
            self.roster.restore(saved, &path)?;
            self.console.show("ROSTER LOADED.")?;
        } else {
            self.console.show("LOAD ABORTED.")?;
        }
        Ok(())
    }

    fn reset_roster(&mut self) -> Result<()> {
        self.console.banner("RESET THE ROSTER")?;
        if !self.roster.is_resettable() {
            return Err(Error::NothingToReset);
        }
        self.console
            .show("WARNING: All unsaved changes will be lost! Continue?")?;
        if self.console.read_yes_no()? {
            self.roster.reset()?;
            self.console.show("ROSTER RESET.")?;
        } else {
            self.console.show("RESET ABORTED.")?;
        }
        Ok(())
    }

    fn save_roster(&mut self) -> Result<()> {
        self.console.banner("SAVE CURRENT ROSTER")?;
        if self.roster.is_empty() {
            return Err(Error::NothingToSave);
        }
        let violations = self.roster.integrity_violations();
        if !violations.is_empty() {
            warn!(?violations, "saving pilots with inconsistent hours");
            self.console.show(&format!(
                "WARNING: hours do not add up for pilot IDs {violations:?}."
            ))?;
        }

        let name = self
            .console
            .read_alpha_string("Enter a name for the roster (letters only): ")?;
        if self.store.path_for(&name)?.exists() {
            self.console
                .show(&format!("A roster called {name} already exists. Overwrite?"))?;
            if !self.console.read_yes_no()? {
                self.console.show("SAVE ABORTED.")?;
                return Ok(());
            }
        }
        let path = self.store.save(&name, &self.roster)?;
        self.console
            .show(&format!("Roster saved to {}.", path.display()))?;
        self.console.pause()
    }

    // === Prompts ===

    fn edit_actions(&self) -> Vec<EditAction> {
        let mut actions = vec![EditAction::Name];
        if self.config.tracks(Field::Position) {
            actions.push(EditAction::Position);
        }
        if self.config.tracks(Field::BaseMonth) {
            actions.push(EditAction::Months);
        }
        actions.push(EditAction::Hours);
        actions
    }

    fn read_draft(&mut self) -> Result<CrewDraft> {
        let tracks = |field| self.config.tracks(field);
        let (middle, position, license, month, pic, sic, status) = (
            tracks(Field::MiddleName),
            tracks(Field::Position),
            tracks(Field::LicenseNumber),
            tracks(Field::BaseMonth),
            tracks(Field::PicHours),
            tracks(Field::SicHours),
            tracks(Field::Status),
        );

        self.console.show("Set Name")?;
        let given_name = self.console.read_alpha_string("Input given name: ")?;
        let middle_name = if middle {
            Some(self.console.read_alpha_string("Input middle name: ")?)
        } else {
            None
        };
        let surname = self.console.read_alpha_string("Input surname: ")?;

        let mut draft = CrewDraft {
            middle_name,
            ..CrewDraft::new(given_name, surname, String::new())
        };
        if position {
            draft.position = Some(self.read_position()?.to_string());
        }
        if license {
            draft.license_number = Some(self.console.read_text("Input license number: ")?);
        }
        if month {
            draft.base_month = Some(self.read_month()?.to_string());
        }
        draft.total_hours = self
            .read_hours("Pilot's total flying hours: ", TOTAL_HOURS)?
            .to_string();
        if pic {
            draft.pic_hours = Some(self.read_hours("Pilot's PIC hours: ", LOGGED_HOURS)?.to_string());
        }
        if sic {
            draft.sic_hours = Some(self.read_hours("Pilot's SIC hours: ", LOGGED_HOURS)?.to_string());
        }
        if status {
            self.console.show("Is the pilot active?")?;
            draft.active = Some(self.console.read_yes_no()?);
        }
        Ok(draft)
    }

    fn read_group(&mut self, action: EditAction) -> Result<FieldGroup> {
        Ok(match action {
            EditAction::Name => {
                self.console.show("Set Name")?;
                FieldGroup::Name {
                    given_name: self.console.read_alpha_string("Input given name: ")?,
                    surname: self.console.read_alpha_string("Input surname: ")?,
                }
            }
            EditAction::Position => FieldGroup::Position(self.read_position()?.to_string()),
            EditAction::Months => FieldGroup::Months(self.read_month()?.to_string()),
            EditAction::Hours => {
                let total_hours = self
                    .read_hours("Pilot's total flying hours: ", TOTAL_HOURS)?
                    .to_string();
                let pic_hours = if self.config.tracks(Field::PicHours) {
                    Some(self.read_hours("Pilot's PIC hours: ", LOGGED_HOURS)?.to_string())
                } else {
                    None
                };
                let sic_hours = if self.config.tracks(Field::SicHours) {
                    Some(self.read_hours("Pilot's SIC hours: ", LOGGED_HOURS)?.to_string())
                } else {
                    None
                };
                FieldGroup::Hours {
                    total_hours,
                    pic_hours,
                    sic_hours,
                }
            }
        })
    }

    /// Zero-based position index.
    fn read_position(&mut self) -> Result<u32> {
        self.console.show("Set Crew Member Position")?;
        let labels: Vec<&str> = Position::ALL.iter().map(|p| p.code()).collect();
        self.console.render_menu(&labels)?;
        let choice = self
            .console
            .read_bounded_integer("Pilot's crew position: ", 1, menu_len(labels.len()))?;
        Ok(choice - 1)
    }

    /// Zero-based month index.
    fn read_month(&mut self) -> Result<u32> {
        self.console.show("Set Base Month")?;
        let labels: Vec<&str> = Month::ALL.iter().map(|m| m.label()).collect();
        self.console.render_menu(&labels)?;
        let choice = self
            .console
            .read_bounded_integer("Base month: ", 1, menu_len(labels.len()))?;
        Ok(choice - 1)
    }

    fn read_hours(&mut self, prompt: &str, bounds: Bounds) -> Result<u32> {
        self.console
            .read_bounded_integer(prompt, bounds.min, bounds.max)
    }
}
