//! In-memory student records.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use campus_core::Subject;

use crate::error::{Result, ServiceError};

/// A student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    /// Assigned identifier.
    pub id: u32,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Contact address.
    pub email: String,
    /// Enrolled programme.
    pub course: String,
    /// Subject that created the record, absent for seeded records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Fields for a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Contact address.
    pub email: String,
    /// Enrolled programme.
    pub course: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    /// New name.
    pub name: Option<String>,
    /// New age.
    pub age: Option<u32>,
    /// New address.
    pub email: Option<String>,
    /// New programme.
    pub course: Option<String>,
}

struct Inner {
    students: Vec<Student>,
    next_id: u32,
}

/// Thread-safe student store with sequential ids.
pub struct StudentStore {
    inner: RwLock<Inner>,
}

impl StudentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                students: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store with three sample students.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        for (name, age, email, course) in [
            ("John Doe", 20, "john@example.com", "Computer Science"),
            ("Jane Smith", 22, "jane@example.com", "Information Technology"),
            ("Mike Johnson", 21, "mike@example.com", "Software Engineering"),
        ] {
            store.insert(
                NewStudent {
                    name: name.to_string(),
                    age,
                    email: email.to_string(),
                    course: course.to_string(),
                },
                None,
            );
        }
        store
    }

    /// All students in id order.
    #[must_use]
    pub fn list(&self) -> Vec<Student> {
        self.inner.read().students.clone()
    }

    /// Look up one student.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn get(&self, id: u32) -> Result<Student> {
        self.inner
            .read()
            .students
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    /// Add a student, recording who created it.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the name or email is blank.
    pub fn create(&self, student: NewStudent, created_by: Option<&Subject>) -> Result<Student> {
        require_non_blank("name", &student.name)?;
        require_non_blank("email", &student.email)?;
        Ok(self.insert(student, created_by))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `BadRequest` if a given name
    /// or email is blank.
    pub fn update(&self, id: u32, update: StudentUpdate) -> Result<Student> {
        if let Some(name) = &update.name {
            require_non_blank("name", name)?;
        }
        if let Some(email) = &update.email {
            require_non_blank("email", email)?;
        }

        let mut inner = self.inner.write();
        let student = inner
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ServiceError::NotFound(id))?;

        if let Some(name) = update.name {
            student.name = name;
        }
        if let Some(age) = update.age {
            student.age = age;
        }
        if let Some(email) = update.email {
            student.email = email;
        }
        if let Some(course) = update.course {
            student.course = course;
        }
        Ok(student.clone())
    }

    /// Remove a student.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: u32) -> Result<Student> {
        let mut inner = self.inner.write();
        let index = inner
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        Ok(inner.students.remove(index))
    }

    fn insert(&self, student: NewStudent, created_by: Option<&Subject>) -> Student {
        let mut inner = self.inner.write();
        let record = Student {
            id: inner.next_id,
            name: student.name,
            age: student.age,
            email: student.email,
            course: student.course,
            created_by: created_by.map(ToString::to_string),
        };
        inner.next_id += 1;
        inner.students.push(record.clone());
        record
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

impl Default for StudentStore {
    fn default() -> Self {
        Self::new()
    }
}
