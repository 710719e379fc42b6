//! Employee directory use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for employee CRUD callers.
//! - Delegate persistence and uniqueness enforcement to the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/uniqueness contracts.
//! - The directory owns the employee lifecycle; nothing here touches
//!   attendance records, including on delete (no cascade).

use crate::model::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeUpdate};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoResult;

/// Use-case service owning employee records.
pub struct EmployeeDirectory<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeDirectory<R> {
    /// Creates a directory using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all employees, newest first.
    pub fn list(&self) -> RepoResult<Vec<Employee>> {
        self.repo.list_employees()
    }

    /// Gets one employee by stable ID.
    pub fn get(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.repo.get_employee(id)
    }

    /// Validates and creates a new employee.
    ///
    /// # Contract
    /// - Collisions are reported in order: badge code first, then email.
    pub fn create(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        self.repo.create_employee(draft)
    }

    /// Applies a partial update; omitted fields stay unchanged.
    pub fn update(&self, id: EmployeeId, update: &EmployeeUpdate) -> RepoResult<Employee> {
        self.repo.update_employee(id, update)
    }

    /// Deletes one employee. Existing attendance records keep their
    /// (now dangling) reference.
    pub fn delete(&self, id: EmployeeId) -> RepoResult<()> {
        self.repo.delete_employee(id)
    }

    /// Counts all employees.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_employees()
    }
}
