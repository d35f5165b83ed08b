//! Crew roster - pilots and soldiers aboard aircraft.
//!
//! Seats hold employee UCNs. An employee sits in at most one aircraft, and
//! only in aircraft of the base they live at.

use geoscape_logic::constants::MAX_ACTIVETEAM;

use crate::components::*;
use crate::employees::EmployeeKind;
use crate::engine::Campaign;
use crate::error::CrewError;

impl Campaign {
    /// Seat a pilot.
    pub fn assign_pilot(&mut self, id: AircraftId, ucn: Ucn) -> Result<(), CrewError> {
        self.check_assignable(id, ucn, EmployeeKind::Pilot)?;
        let a = self.aircraft_mut(id).ok_or(CrewError::UnknownAircraft(id))?;
        if a.pilot.is_some() {
            return Err(CrewError::PilotSeatTaken);
        }
        a.pilot = Some(ucn);
        Ok(())
    }

    /// Seat a soldier in the first free team seat.
    pub fn assign_team_member(&mut self, id: AircraftId, ucn: Ucn) -> Result<(), CrewError> {
        self.check_assignable(id, ucn, EmployeeKind::Soldier)?;
        let a = self.aircraft_mut(id).ok_or(CrewError::UnknownAircraft(id))?;
        if a.team_size() >= MAX_ACTIVETEAM {
            return Err(CrewError::TeamFull);
        }
        let seat = a.team.iter_mut().find(|s| s.is_none()).ok_or(CrewError::TeamFull)?;
        *seat = Some(ucn);
        Ok(())
    }

    /// Take an employee off an aircraft, whichever seat they hold.
    pub fn remove_crew_member(&mut self, id: AircraftId, ucn: Ucn) -> Result<(), CrewError> {
        let a = self.aircraft_mut(id).ok_or(CrewError::UnknownAircraft(id))?;
        if a.pilot == Some(ucn) {
            a.pilot = None;
            return Ok(());
        }
        let seat = a
            .team
            .iter_mut()
            .find(|s| **s == Some(ucn))
            .ok_or(CrewError::NotAboard(ucn))?;
        *seat = None;
        if a.team_size() == 0 {
            a.team_reservation = None;
        }
        Ok(())
    }

    /// Empty every seat, pilot included.
    pub fn remove_all_crew(&mut self, id: AircraftId) -> Result<(), CrewError> {
        let a = self.aircraft_mut(id).ok_or(CrewError::UnknownAircraft(id))?;
        for seat in a.team.iter_mut() {
            *seat = None;
        }
        a.pilot = None;
        a.team_reservation = None;
        Ok(())
    }

    /// Aircraft the employee serves aboard. Employees being transferred are
    /// aboard nothing.
    pub fn employee_aircraft(&self, ucn: Ucn) -> Option<AircraftId> {
        if self.employees.get(ucn)?.in_transfer {
            return None;
        }
        self.aircraft_order
            .iter()
            .copied()
            .find(|id| self.aircraft(*id).is_some_and(|a| a.carries(ucn)))
    }

    pub fn is_in_aircraft_team(&self, id: AircraftId, ucn: Ucn) -> bool {
        self.aircraft(id).is_some_and(|a| a.team.contains(&Some(ucn)))
    }

    /// Put a pilot into the first aircraft of `base` without one.
    pub fn auto_add_pilot(&mut self, base: BaseId, ucn: Ucn) -> Option<AircraftId> {
        let candidates = self.base(base)?.aircraft.clone();
        let id = candidates
            .into_iter()
            .find(|id| self.aircraft(*id).is_some_and(|a| !a.has_pilot()))?;
        match self.assign_pilot(id, ucn) {
            Ok(()) => Some(id),
            Err(e) => {
                log::debug!("auto_add_pilot: {} not seated: {}", ucn, e);
                None
            }
        }
    }

    /// Unseat a pilot from whichever aircraft of `base` they fly.
    pub fn remove_pilot_from_assigned_aircraft(&mut self, base: BaseId, ucn: Ucn) -> bool {
        let ids = match self.base(base) {
            Some(b) => b.aircraft.clone(),
            None => return false,
        };
        for id in ids {
            if let Some(a) = self.aircraft_mut(id) {
                if a.pilot == Some(ucn) {
                    a.pilot = None;
                    return true;
                }
            }
        }
        false
    }

    /// Fill free seats with unassigned soldiers of the home base. Returns
    /// how many were seated.
    pub fn assign_initial(&mut self, id: AircraftId) -> usize {
        let (base, free) = match self.aircraft(id) {
            Some(a) => (a.home_base, a.max_team_size() - a.team_size()),
            None => return 0,
        };
        let soldiers: Vec<Ucn> = self
            .employees
            .unassigned(base, EmployeeKind::Soldier, |u| self.employee_aircraft(u).is_some())
            .map(|e| e.ucn)
            .take(free)
            .collect();
        soldiers
            .into_iter()
            .filter(|ucn| self.assign_team_member(id, *ucn).is_ok())
            .count()
    }

    /// Mark the current team as reserved for a mission.
    pub fn reserve_team(&mut self, id: AircraftId, mission: &str) -> bool {
        match self.aircraft_mut(id) {
            Some(a) if a.team_size() > 0 => {
                a.team_reservation = Some(mission.to_string());
                true
            }
            _ => false,
        }
    }

    /// Storage space taken by the equipment of the team aboard.
    pub fn storage_room(&self, id: AircraftId) -> u32 {
        let a = match self.aircraft(id) {
            Some(a) => a,
            None => return 0,
        };
        a.team_members()
            .filter_map(|ucn| self.employees.get(ucn))
            .map(|e| e.carried_size())
            .sum()
    }

    // ── Helpers ──

    fn check_assignable(&self, id: AircraftId, ucn: Ucn, kind: EmployeeKind) -> Result<(), CrewError> {
        let a = self.aircraft(id).ok_or(CrewError::UnknownAircraft(id))?;
        let e = self.employees.get(ucn).ok_or(CrewError::UnknownEmployee(ucn))?;
        if e.kind != kind {
            return Err(match kind {
                EmployeeKind::Pilot => CrewError::NotAPilot(ucn),
                _ => CrewError::NotASoldier(ucn),
            });
        }
        if e.base != a.home_base {
            return Err(CrewError::WrongBase(ucn));
        }
        if let Some(other) = self.employee_aircraft(ucn) {
            return Err(CrewError::AlreadyAssigned { ucn, aircraft: other });
        }
        Ok(())
    }
}
