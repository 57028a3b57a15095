use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::date::BirthDate;
use crate::errors::{BackendError, DateError};
use crate::student::{Id, NewStudent, Student, StudentUpdate};

/// The students loaded by [`MemoryStore::seeded`].
const DEMO_ROSTER: &[(&str, &str)] = &[
    ("Ten Lee", "1996-02-27"),
    ("Doyoung", "1996-02-01"),
    ("Jaemin", "2000-08-13"),
    ("Jeno", "2000-04-23"),
    ("Haechan", "2000-06-06"),
];

/// Holds the roster. Every read hands back owned copies, so callers
/// never see later changes.
pub trait Store: Send + Sync {
    /// Returns every student, oldest entry first.
    fn all(&self) -> Result<Vec<Student>, BackendError>;

    fn find(&self, id: Id) -> Result<Option<Student>, BackendError>;

    /// Adds a student under a fresh ID.
    fn insert(&self, student: NewStudent) -> Result<Student, BackendError>;

    /// Changes a student, returning the new version if it exists.
    fn update(&self, id: Id, update: StudentUpdate) -> Result<Option<Student>, BackendError>;

    /// Removes a student, returning it if it existed.
    fn remove(&self, id: Id) -> Result<Option<Student>, BackendError>;
}

#[derive(Debug, Default)]
struct Roster {
    students: Vec<Student>,

    /// The last ID handed out. IDs are never reused, even after a delete.
    last_id: Id,
}

impl Roster {
    fn position(&self, id: Id) -> Option<usize> {
        self.students.iter().position(|student| student.id() == id)
    }
}

/// A store that keeps the roster in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    roster: RwLock<Roster>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the demo roster.
    pub fn seeded() -> Result<Self, DateError> {
        let store = Self::new();

        {
            let mut roster = store.roster.write().unwrap_or_else(|e| e.into_inner());

            for (name, birth_date) in DEMO_ROSTER {
                let birth_date = BirthDate::parse(birth_date)?;
                roster.last_id += 1;
                let id = roster.last_id;
                roster
                    .students
                    .push(Student::new(id, (*name).to_owned(), birth_date));
            }
        }

        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Roster>, BackendError> {
        self.roster.read().map_err(|_| BackendError::StoreUnavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Roster>, BackendError> {
        self.roster.write().map_err(|_| BackendError::StoreUnavailable)
    }
}

impl Store for MemoryStore {
    fn all(&self) -> Result<Vec<Student>, BackendError> {
        Ok(self.read()?.students.clone())
    }

    fn find(&self, id: Id) -> Result<Option<Student>, BackendError> {
        let roster = self.read()?;

        Ok(roster.position(id).map(|i| roster.students[i].clone()))
    }

    fn insert(&self, student: NewStudent) -> Result<Student, BackendError> {
        let mut roster = self.write()?;

        roster.last_id += 1;
        let student = Student::new(roster.last_id, student.name, student.birth_date);
        roster.students.push(student.clone());

        Ok(student)
    }

    fn update(&self, id: Id, update: StudentUpdate) -> Result<Option<Student>, BackendError> {
        let mut roster = self.write()?;

        Ok(roster.position(id).map(|i| {
            let student = &mut roster.students[i];
            student.apply(update);
            student.clone()
        }))
    }

    fn remove(&self, id: Id) -> Result<Option<Student>, BackendError> {
        let mut roster = self.write()?;

        Ok(roster.position(id).map(|i| roster.students.remove(i)))
    }
}
