//! Cascading selection resolver for the placement chain
//!
//! Four ordered slots: exam type (BAC), track (série), program (filière),
//! level (niveau). Selecting at slot *k* clears every selection and option
//! list below *k* and invalidates their in-flight fetches.
//!
//! Fetches are decoupled from state: a `select_*` call returns a
//! [`FetchTicket`] capturing the child slot's generation at selection time;
//! the caller performs the fetch and hands the result back through
//! `apply_*`. A ticket whose generation no longer matches is discarded
//! without touching state, which is what neutralizes the
//! stale-parent-repopulates-child race.

use crate::error::{CascadeError, CatalogError};
use crate::source::CatalogSource;
use portal_types::{ExamType, Level, OptionId, Program, Track};
use tracing::debug;

/// The four cascade positions, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    ExamType,
    Track,
    Program,
    Level,
}

impl Slot {
    fn index(&self) -> usize {
        match self {
            Slot::ExamType => 0,
            Slot::Track => 1,
            Slot::Program => 2,
            Slot::Level => 3,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Slot::ExamType => "exam type",
            Slot::Track => "track",
            Slot::Program => "program",
            Slot::Level => "level",
        }
    }
}

/// Proof of which fetch a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    slot: Slot,
    generation: u64,
}

impl FetchTicket {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// Whether an `apply_*` call took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Result stored
    Applied,
    /// The parent selection changed while the fetch was in flight; the
    /// result was discarded
    Stale,
}

/// State of the four dependent option lists and selections.
#[derive(Debug, Default)]
pub struct CascadeResolver {
    exam_types: Vec<ExamType>,
    tracks: Vec<Track>,
    programs: Vec<Program>,
    levels: Vec<Level>,
    selected: [Option<OptionId>; 4],
    generations: [u64; 4],
    errors: [Option<CatalogError>; 4],
}

impl CascadeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root list. Clears everything below it.
    pub fn set_exam_types(&mut self, exam_types: Vec<ExamType>) {
        self.exam_types = exam_types;
        self.reset_from(Slot::ExamType);
    }

    /// Select (or clear) the exam type. Slots below are wiped either way; a
    /// non-empty selection yields a ticket for the track fetch.
    pub fn select_exam_type(
        &mut self,
        id: Option<OptionId>,
    ) -> Result<Option<FetchTicket>, CascadeError> {
        if let Some(id) = id {
            if !self.exam_types.iter().any(|e| e.id == id) {
                return Err(CascadeError::UnknownOption {
                    slot: Slot::ExamType.name(),
                });
            }
        }
        self.selected[0] = id;
        self.reset_from(Slot::Track);
        debug!(?id, "exam type selected");
        Ok(id.map(|_| self.ticket(Slot::Track)))
    }

    /// Select (or clear) the track. Requires an exam type selection when a
    /// value is being set.
    pub fn select_track(
        &mut self,
        id: Option<OptionId>,
    ) -> Result<Option<FetchTicket>, CascadeError> {
        if id.is_some() {
            self.require_parent(Slot::Track, Slot::ExamType)?;
            if !self.tracks.iter().any(|t| Some(t.id) == id) {
                return Err(CascadeError::UnknownOption {
                    slot: Slot::Track.name(),
                });
            }
        }
        self.selected[1] = id;
        self.reset_from(Slot::Program);
        Ok(id.map(|_| self.ticket(Slot::Program)))
    }

    /// Select (or clear) the program. Requires a track selection when a
    /// value is being set.
    pub fn select_program(
        &mut self,
        id: Option<OptionId>,
    ) -> Result<Option<FetchTicket>, CascadeError> {
        if id.is_some() {
            self.require_parent(Slot::Program, Slot::Track)?;
            if !self.programs.iter().any(|p| Some(p.id) == id) {
                return Err(CascadeError::UnknownOption {
                    slot: Slot::Program.name(),
                });
            }
        }
        self.selected[2] = id;
        self.reset_from(Slot::Level);
        Ok(id.map(|_| self.ticket(Slot::Level)))
    }

    /// Select (or clear) the level. Terminal: no further fetch.
    pub fn select_level(&mut self, id: Option<OptionId>) -> Result<(), CascadeError> {
        if id.is_some() {
            self.require_parent(Slot::Level, Slot::Program)?;
            if !self.levels.iter().any(|l| Some(l.id) == id) {
                return Err(CascadeError::UnknownOption {
                    slot: Slot::Level.name(),
                });
            }
        }
        self.selected[3] = id;
        Ok(())
    }

    /// Store a track fetch result, unless the ticket is stale.
    pub fn apply_tracks(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Track>, CatalogError>,
    ) -> Applied {
        debug_assert_eq!(ticket.slot, Slot::Track);
        if !self.ticket_current(&ticket) {
            debug!("discarding stale track list");
            return Applied::Stale;
        }
        match result {
            Ok(tracks) => self.tracks = tracks,
            Err(err) => self.errors[1] = Some(err),
        }
        Applied::Applied
    }

    /// Store a program fetch result, unless the ticket is stale.
    pub fn apply_programs(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Program>, CatalogError>,
    ) -> Applied {
        debug_assert_eq!(ticket.slot, Slot::Program);
        if !self.ticket_current(&ticket) {
            debug!("discarding stale program list");
            return Applied::Stale;
        }
        match result {
            Ok(programs) => self.programs = programs,
            Err(err) => self.errors[2] = Some(err),
        }
        Applied::Applied
    }

    /// Store a level fetch result, unless the ticket is stale.
    pub fn apply_levels(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Level>, CatalogError>,
    ) -> Applied {
        debug_assert_eq!(ticket.slot, Slot::Level);
        if !self.ticket_current(&ticket) {
            debug!("discarding stale level list");
            return Applied::Stale;
        }
        match result {
            Ok(levels) => self.levels = levels,
            Err(err) => self.errors[3] = Some(err),
        }
        Applied::Applied
    }

    // -------- driven variants: select, fetch, apply in one call --------

    /// Fetch the root exam-type list through the source.
    pub async fn load_exam_types(
        &mut self,
        source: &dyn CatalogSource,
    ) -> Result<(), CatalogError> {
        let exam_types = source.exam_types().await?;
        self.set_exam_types(exam_types);
        Ok(())
    }

    /// Select an exam type and resolve its track list.
    pub async fn choose_exam_type(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        let ticket = self.select_exam_type(id)?;
        if let (Some(ticket), Some(id)) = (ticket, id) {
            let result = source.tracks_of(id).await;
            self.apply_tracks(ticket, result);
        }
        Ok(())
    }

    /// Select a track and resolve its program list.
    pub async fn choose_track(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        let ticket = self.select_track(id)?;
        if let (Some(ticket), Some(id)) = (ticket, id) {
            let result = source.programs_of(id).await;
            self.apply_programs(ticket, result);
        }
        Ok(())
    }

    /// Select a program and resolve its level list.
    pub async fn choose_program(
        &mut self,
        id: Option<OptionId>,
        source: &dyn CatalogSource,
    ) -> Result<(), CascadeError> {
        let ticket = self.select_program(id)?;
        if let (Some(ticket), Some(id)) = (ticket, id) {
            // The level endpoint is scoped to both the track and the program.
            let track = self.selected[1].expect("parent checked by select_program");
            let result = source.levels_of(track, id).await;
            self.apply_levels(ticket, result);
        }
        Ok(())
    }

    // -------- accessors --------

    pub fn exam_types(&self) -> &[ExamType] {
        &self.exam_types
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn selected_exam_type(&self) -> Option<OptionId> {
        self.selected[0]
    }

    pub fn selected_track(&self) -> Option<OptionId> {
        self.selected[1]
    }

    pub fn selected_program(&self) -> Option<OptionId> {
        self.selected[2]
    }

    pub fn selected_level(&self) -> Option<OptionId> {
        self.selected[3]
    }

    /// Scheme code of the selected exam type, used by the score-vs-mention
    /// validation branch.
    pub fn selected_exam_type_code(&self) -> Option<&str> {
        let id = self.selected[0]?;
        self.exam_types
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.code.as_str())
    }

    /// Step-local fetch error for a slot, if its last fetch failed.
    pub fn slot_error(&self, slot: Slot) -> Option<&CatalogError> {
        self.errors[slot.index()].as_ref()
    }

    // -------- internals --------

    fn ticket(&self, slot: Slot) -> FetchTicket {
        FetchTicket {
            slot,
            generation: self.generations[slot.index()],
        }
    }

    fn ticket_current(&self, ticket: &FetchTicket) -> bool {
        self.generations[ticket.slot.index()] == ticket.generation
    }

    fn require_parent(&self, child: Slot, parent: Slot) -> Result<(), CascadeError> {
        if self.selected[parent.index()].is_none() {
            return Err(CascadeError::ParentNotSelected {
                child: child.name(),
                parent: parent.name(),
            });
        }
        Ok(())
    }

    /// Clear selections, lists and errors from `slot` down, bumping each
    /// cleared slot's generation so in-flight fetches for them go stale.
    fn reset_from(&mut self, slot: Slot) {
        for index in slot.index()..4 {
            self.selected[index] = None;
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.errors[index] = None;
            match index {
                1 => self.tracks.clear(),
                2 => self.programs.clear(),
                3 => self.levels.clear(),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam(id: i64, code: &str) -> ExamType {
        ExamType {
            id: OptionId::new(id),
            code: code.to_string(),
            label: code.to_string(),
        }
    }

    fn track(id: i64) -> Track {
        Track {
            id: OptionId::new(id),
            code: format!("S{id}"),
            label: format!("Série {id}"),
        }
    }

    fn program(id: i64) -> Program {
        Program {
            id: OptionId::new(id),
            code: format!("F{id}"),
            label: format!("Filière {id}"),
        }
    }

    fn resolver() -> CascadeResolver {
        let mut r = CascadeResolver::new();
        r.set_exam_types(vec![exam(1, "BAC_GEN"), exam(2, "GCE_AL")]);
        r
    }

    #[test]
    fn test_selecting_child_requires_parent() {
        let mut r = resolver();
        let err = r.select_track(Some(OptionId::new(10))).unwrap_err();
        assert!(matches!(err, CascadeError::ParentNotSelected { .. }));
    }

    #[test]
    fn test_upstream_change_clears_everything_below() {
        let mut r = resolver();

        let t = r.select_exam_type(Some(OptionId::new(1))).unwrap().unwrap();
        r.apply_tracks(t, Ok(vec![track(10), track(11)]));
        let t = r.select_track(Some(OptionId::new(10))).unwrap().unwrap();
        r.apply_programs(t, Ok(vec![program(20)]));
        r.select_program(Some(OptionId::new(20))).unwrap();

        // Change the exam type: track, program and level must all be empty,
        // selections and lists alike. No stale track under the new parent.
        r.select_exam_type(Some(OptionId::new(2))).unwrap();
        assert_eq!(r.selected_track(), None);
        assert_eq!(r.selected_program(), None);
        assert_eq!(r.selected_level(), None);
        assert!(r.tracks().is_empty());
        assert!(r.programs().is_empty());
        assert!(r.levels().is_empty());
    }

    #[test]
    fn test_late_result_for_superseded_parent_is_discarded() {
        let mut r = resolver();

        let stale = r.select_exam_type(Some(OptionId::new(1))).unwrap().unwrap();
        // User changes their mind before the first fetch lands.
        let fresh = r.select_exam_type(Some(OptionId::new(2))).unwrap().unwrap();

        assert_eq!(r.apply_tracks(stale, Ok(vec![track(10)])), Applied::Stale);
        assert!(r.tracks().is_empty());

        assert_eq!(r.apply_tracks(fresh, Ok(vec![track(42)])), Applied::Applied);
        assert_eq!(r.tracks().len(), 1);
    }

    #[test]
    fn test_failed_fetch_keeps_parent_selection() {
        let mut r = resolver();
        let t = r.select_exam_type(Some(OptionId::new(1))).unwrap().unwrap();
        r.apply_tracks(t, Err(CatalogError("boom".into())));

        assert_eq!(r.selected_exam_type(), Some(OptionId::new(1)));
        assert!(r.tracks().is_empty());
        assert!(r.slot_error(Slot::Track).is_some());

        // A reselection clears the error.
        r.select_exam_type(Some(OptionId::new(2))).unwrap();
        assert!(r.slot_error(Slot::Track).is_none());
    }

    #[test]
    fn test_clearing_selection_requires_no_fetch() {
        let mut r = resolver();
        r.select_exam_type(Some(OptionId::new(1))).unwrap();
        let ticket = r.select_exam_type(None).unwrap();
        assert!(ticket.is_none());
        assert_eq!(r.selected_exam_type(), None);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let mut r = resolver();
        let err = r.select_exam_type(Some(OptionId::new(99))).unwrap_err();
        assert!(matches!(err, CascadeError::UnknownOption { .. }));
    }

    #[test]
    fn test_exam_type_code_lookup() {
        let mut r = resolver();
        assert_eq!(r.selected_exam_type_code(), None);
        r.select_exam_type(Some(OptionId::new(2))).unwrap();
        assert_eq!(r.selected_exam_type_code(), Some("GCE_AL"));
    }

    #[test]
    fn test_full_chain_selection() {
        let mut r = resolver();
        let t = r.select_exam_type(Some(OptionId::new(1))).unwrap().unwrap();
        r.apply_tracks(t, Ok(vec![track(10)]));
        let t = r.select_track(Some(OptionId::new(10))).unwrap().unwrap();
        r.apply_programs(t, Ok(vec![program(20)]));
        let t = r.select_program(Some(OptionId::new(20))).unwrap().unwrap();
        r.apply_levels(
            t,
            Ok(vec![Level {
                id: OptionId::new(30),
                code: "L1".into(),
                label: "Niveau 1".into(),
            }]),
        );
        r.select_level(Some(OptionId::new(30))).unwrap();
        assert_eq!(r.selected_level(), Some(OptionId::new(30)));
    }
}
