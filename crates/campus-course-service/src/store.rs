//! In-memory course catalogue.
//!
//! Ids are assigned sequentially and never reused.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{CourseError, Result};

/// A course in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Assigned identifier.
    pub id: u32,
    /// Course title.
    pub name: String,
    /// Catalogue code, e.g. `CS101`.
    pub code: String,
    /// Short description.
    pub description: String,
    /// Credit points.
    pub credits: u32,
}

/// Fields for a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    /// Course title.
    pub name: String,
    /// Catalogue code.
    pub code: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Credit points.
    pub credits: u32,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    /// New title.
    pub name: Option<String>,
    /// New code.
    pub code: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New credit points.
    pub credits: Option<u32>,
}

struct Catalogue {
    courses: Vec<Course>,
    next_id: u32,
}

/// Thread-safe course store.
pub struct CourseStore {
    inner: RwLock<Catalogue>,
}

impl CourseStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Catalogue {
                courses: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a store with the three introductory courses.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        for (name, code, description, credits) in [
            ("Computer Science", "CS101", "Introduction to Computer Science", 3),
            ("Information Technology", "IT201", "Fundamentals of Information Technology", 3),
            ("Software Engineering", "SE301", "Principles of Software Engineering", 4),
        ] {
            store.insert(NewCourse {
                name: name.to_string(),
                code: code.to_string(),
                description: description.to_string(),
                credits,
            });
        }
        store
    }

    /// All courses in id order.
    #[must_use]
    pub fn list(&self) -> Vec<Course> {
        self.inner.read().courses.clone()
    }

    /// Look up one course.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn get(&self, id: u32) -> Result<Course> {
        self.inner
            .read()
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(CourseError::NotFound(id))
    }

    /// Add a course.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the name or code is blank.
    pub fn create(&self, course: NewCourse) -> Result<Course> {
        require_non_blank("name", &course.name)?;
        require_non_blank("code", &course.code)?;
        Ok(self.insert(course))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `BadRequest` if a given name
    /// or code is blank.
    pub fn update(&self, id: u32, update: CourseUpdate) -> Result<Course> {
        if let Some(name) = &update.name {
            require_non_blank("name", name)?;
        }
        if let Some(code) = &update.code {
            require_non_blank("code", code)?;
        }

        let mut inner = self.inner.write();
        let course = inner
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CourseError::NotFound(id))?;

        if let Some(name) = update.name {
            course.name = name;
        }
        if let Some(code) = update.code {
            course.code = code;
        }
        if let Some(description) = update.description {
            course.description = description;
        }
        if let Some(credits) = update.credits {
            course.credits = credits;
        }
        Ok(course.clone())
    }

    /// Remove a course.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: u32) -> Result<Course> {
        let mut inner = self.inner.write();
        let index = inner
            .courses
            .iter()
            .position(|c| c.id == id)
            .ok_or(CourseError::NotFound(id))?;
        Ok(inner.courses.remove(index))
    }

    fn insert(&self, course: NewCourse) -> Course {
        let mut inner = self.inner.write();
        let record = Course {
            id: inner.next_id,
            name: course.name,
            code: course.code,
            description: course.description,
            credits: course.credits,
        };
        inner.next_id += 1;
        inner.courses.push(record.clone());
        record
    }
}

impl Default for CourseStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CourseError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_course(code: &str) -> NewCourse {
        NewCourse {
            name: "Data Structures".to_string(),
            code: code.to_string(),
            description: String::new(),
            credits: 4,
        }
    }

    #[test]
    fn seeded_catalogue() {
        let store = CourseStore::seeded();
        let codes: Vec<_> = store.list().into_iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["CS101", "IT201", "SE301"]);
        assert_eq!(store.get(3).unwrap().credits, 4);
    }

    #[test]
    fn create_assigns_next_id_and_ids_are_not_reused() {
        let store = CourseStore::seeded();
        assert_eq!(store.create(new_course("CS201")).unwrap().id, 4);

        store.delete(4).unwrap();
        assert_eq!(store.create(new_course("CS202")).unwrap().id, 5);
    }

    #[test]
    fn update_is_partial() {
        let store = CourseStore::seeded();
        let updated = store
            .update(
                2,
                CourseUpdate {
                    credits: Some(5),
                    ..CourseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.credits, 5);
        assert_eq!(updated.code, "IT201");
    }

    #[test]
    fn blank_name_or_code_is_rejected() {
        let store = CourseStore::seeded();
        assert!(matches!(
            store.create(new_course(" ")),
            Err(CourseError::BadRequest(_))
        ));
        assert!(matches!(
            store.update(
                1,
                CourseUpdate {
                    name: Some(String::new()),
                    ..CourseUpdate::default()
                }
            ),
            Err(CourseError::BadRequest(_))
        ));
        assert_eq!(store.get(1).unwrap().name, "Computer Science");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = CourseStore::new();
        assert!(matches!(store.get(1), Err(CourseError::NotFound(1))));
        assert!(matches!(
            store.update(1, CourseUpdate::default()),
            Err(CourseError::NotFound(1))
        ));
        assert!(matches!(store.delete(1), Err(CourseError::NotFound(1))));
    }
}
