//! Employee roster keyed by unique character number.
//!
//! Aircraft refer to crew by UCN, never by position in a list, so hiring
//! and firing never invalidate a seat assignment.

use std::collections::BTreeMap;

use crate::components::{BaseId, Ucn};

/// Employee profession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeKind {
    Soldier,
    Pilot,
    Scientist,
    Worker,
}

/// An item an employee carries, and the storage space it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedItem {
    pub item: String,
    pub size: u32,
}

/// A hired employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub ucn: Ucn,
    pub name: String,
    pub kind: EmployeeKind,
    pub base: BaseId,
    /// Equipment in this employee's inventory; counted in base storage.
    pub inventory: Vec<CarriedItem>,
    /// Being moved between bases by the transfer subsystem.
    pub in_transfer: bool,
}

impl Employee {
    /// Storage space taken by carried items.
    pub fn carried_size(&self) -> u32 {
        self.inventory.iter().map(|i| i.size).sum()
    }
}

/// All employees of the campaign.
#[derive(Debug, Clone, Default)]
pub struct EmployeeRoster {
    employees: BTreeMap<Ucn, Employee>,
    next_ucn: Ucn,
}

impl EmployeeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an employee and return the new UCN.
    pub fn hire(&mut self, name: impl Into<String>, kind: EmployeeKind, base: BaseId) -> Ucn {
        let ucn = self.next_ucn;
        self.next_ucn += 1;
        self.insert(Employee {
            ucn,
            name: name.into(),
            kind,
            base,
            inventory: Vec::new(),
            in_transfer: false,
        });
        ucn
    }

    /// Insert a fully built employee (used by loading). Keeps UCNs unique.
    pub fn insert(&mut self, employee: Employee) {
        self.next_ucn = self.next_ucn.max(employee.ucn + 1);
        self.employees.insert(employee.ucn, employee);
    }

    pub fn get(&self, ucn: Ucn) -> Option<&Employee> {
        self.employees.get(&ucn)
    }

    pub fn get_mut(&mut self, ucn: Ucn) -> Option<&mut Employee> {
        self.employees.get_mut(&ucn)
    }

    /// Remove an employee for good.
    pub fn fire(&mut self, ucn: Ucn) -> Option<Employee> {
        self.employees.remove(&ucn)
    }

    pub fn transfer_to_base(&mut self, ucn: Ucn, base: BaseId) -> bool {
        match self.employees.get_mut(&ucn) {
            Some(e) => {
                e.base = base;
                true
            }
            None => false,
        }
    }

    /// Employees of `kind` at `base` for which `is_assigned` is false, in
    /// UCN order.
    pub fn unassigned<'a>(
        &'a self,
        base: BaseId,
        kind: EmployeeKind,
        is_assigned: impl Fn(Ucn) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Employee> + 'a {
        self.employees
            .values()
            .filter(move |e| e.base == base && e.kind == kind && !e.in_transfer)
            .filter(move |e| !is_assigned(e.ucn))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hire_assigns_unique_ucns() {
        let mut roster = EmployeeRoster::new();
        let a = roster.hire("Ann", EmployeeKind::Soldier, BaseId(0));
        let b = roster.hire("Bo", EmployeeKind::Pilot, BaseId(0));
        assert_ne!(a, b);
        assert_eq!(roster.get(b).unwrap().kind, EmployeeKind::Pilot);
        roster.fire(a);
        let c = roster.hire("Cy", EmployeeKind::Soldier, BaseId(1));
        assert_ne!(c, a);
    }

    #[test]
    fn test_unassigned_filters() {
        let mut roster = EmployeeRoster::new();
        let a = roster.hire("Ann", EmployeeKind::Soldier, BaseId(0));
        let b = roster.hire("Bo", EmployeeKind::Soldier, BaseId(0));
        roster.hire("Cy", EmployeeKind::Soldier, BaseId(1));
        roster.hire("Di", EmployeeKind::Pilot, BaseId(0));
        let free: Vec<Ucn> = roster
            .unassigned(BaseId(0), EmployeeKind::Soldier, move |u| u == a)
            .map(|e| e.ucn)
            .collect();
        assert_eq!(free, vec![b]);
    }
}
