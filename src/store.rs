//! Class document store backed by SQLite.
//!
//! Each class is one row; its students live in the row as a JSON array and
//! are only ever changed by rewriting that row. Mutations report how many
//! documents they modified (0 or 1), counting a write that leaves the document
//! unchanged as 0.

use crate::config::StoreLocation;
use crate::db;
use crate::model::{ClassDocument, ClassGroup, ClassSummary, Student};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("unreadable students for class {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct ClassStore {
    conn: Connection,
    location: StoreLocation,
}

struct ClassRow {
    id: String,
    class_name: String,
    branch: String,
    students: String,
}

impl ClassRow {
    fn into_document(self) -> StoreResult<ClassDocument> {
        let students: Vec<Student> =
            serde_json::from_str(&self.students).map_err(|source| StoreError::Corrupt {
                id: self.id.clone(),
                source,
            })?;
        Ok(ClassDocument {
            id: self.id,
            group: ClassGroup {
                class_name: self.class_name,
                branch: self.branch,
                students,
            },
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

impl ClassStore {
    pub fn open(location: &StoreLocation) -> anyhow::Result<Self> {
        let conn = db::open_db(location)?;
        Ok(ClassStore {
            conn,
            location: location.clone(),
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn find_id_by_class_name(&self, class_name: &str) -> StoreResult<Option<String>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM classes WHERE class_name = ? ORDER BY rowid LIMIT 1",
                [class_name],
                |r| r.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn find_by_class_name(&self, class_name: &str) -> StoreResult<Option<ClassDocument>> {
        self.find_one("class_name", class_name)
    }

    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<ClassDocument>> {
        self.find_one("id", id)
    }

    fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<ClassDocument>> {
        let sql = format!(
            "SELECT id, class_name, branch, students FROM classes WHERE {} = ? ORDER BY rowid LIMIT 1",
            column
        );
        let row = self
            .conn
            .query_row(&sql, [value], |r| {
                Ok(ClassRow {
                    id: r.get(0)?,
                    class_name: r.get(1)?,
                    branch: r.get(2)?,
                    students: r.get(3)?,
                })
            })
            .optional()?;
        row.map(ClassRow::into_document).transpose()
    }

    /// All classes in insertion order, without their students.
    pub fn find_all(&self) -> StoreResult<Vec<ClassSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, class_name, branch FROM classes ORDER BY rowid")?;
        let classes = stmt
            .query_map([], |r| {
                Ok(ClassSummary {
                    id: r.get(0)?,
                    class_name: r.get(1)?,
                    branch: r.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(classes)
    }

    pub fn find_students(&self, id: &str) -> StoreResult<Option<Vec<Student>>> {
        Ok(self.find_by_id(id)?.map(|doc| doc.group.students))
    }

    pub fn find_student_by_roll(&self, id: &str, roll_number: &str) -> StoreResult<Option<Student>> {
        Ok(self
            .find_by_id(id)?
            .and_then(|doc| doc.group.student_by_roll(roll_number).cloned()))
    }

    pub fn has_student_with_roll(&self, id: &str, roll_number: &str) -> StoreResult<bool> {
        Ok(self.find_student_by_roll(id, roll_number)?.is_some())
    }

    pub fn has_student_named(&self, id: &str, name: &str) -> StoreResult<bool> {
        Ok(self
            .find_by_id(id)?
            .map(|doc| doc.group.student_by_name(name).is_some())
            .unwrap_or(false))
    }

    /// Insert a new class document and return its identifier.
    pub fn insert(&self, doc: &ClassDocument) -> StoreResult<String> {
        let students = serde_json::to_string(&doc.group.students)?;
        let ts = now();
        self.conn.execute(
            "INSERT INTO classes(id, class_name, branch, students, created_at, updated_at)
             VALUES(?, ?, ?, ?, ?, ?)",
            (
                &doc.id,
                &doc.group.class_name,
                &doc.group.branch,
                &students,
                &ts,
                &ts,
            ),
        )?;
        Ok(doc.id.clone())
    }

    /// Overwrite className, branch and students. The identifier is kept.
    pub fn replace_fields(&self, id: &str, group: &ClassGroup) -> StoreResult<usize> {
        self.update_one(id, |current| *current = group.clone())
    }

    pub fn delete(&self, id: &str) -> StoreResult<usize> {
        Ok(self.conn.execute("DELETE FROM classes WHERE id = ?", [id])?)
    }

    pub fn push_student(&self, id: &str, student: &Student) -> StoreResult<usize> {
        self.update_one(id, |current| current.students.push(student.clone()))
    }

    /// Remove every student with this name.
    pub fn pull_students_named(&self, id: &str, name: &str) -> StoreResult<usize> {
        self.update_one(id, |current| current.students.retain(|s| s.name != name))
    }

    /// Replace the first student with this name.
    pub fn set_student_named(&self, id: &str, name: &str, student: &Student) -> StoreResult<usize> {
        self.update_one(id, |current| {
            if let Some(slot) = current.students.iter_mut().find(|s| s.name == name) {
                *slot = student.clone();
            }
        })
    }

    /// Merge session entries into the attendance map of the student with this
    /// roll number. Keys not named in `entries` are left alone.
    pub fn set_attendance(
        &self,
        id: &str,
        roll_number: &str,
        entries: &BTreeMap<String, bool>,
    ) -> StoreResult<usize> {
        self.update_one(id, |current| {
            if let Some(s) = current
                .students
                .iter_mut()
                .find(|s| s.roll_number == roll_number)
            {
                for (k, v) in entries {
                    s.attendance.insert(k.clone(), *v);
                }
            }
        })
    }

    fn update_one<F>(&self, id: &str, apply: F) -> StoreResult<usize>
    where
        F: FnOnce(&mut ClassGroup),
    {
        let tx = self.conn.unchecked_transaction()?;
        let row = tx
            .query_row(
                "SELECT id, class_name, branch, students FROM classes WHERE id = ?",
                [id],
                |r| {
                    Ok(ClassRow {
                        id: r.get(0)?,
                        class_name: r.get(1)?,
                        branch: r.get(2)?,
                        students: r.get(3)?,
                    })
                },
            )
            .optional()?;
        let Some(row) = row else {
            return Ok(0);
        };
        let mut doc = row.into_document()?;
        let before = doc.group.clone();
        apply(&mut doc.group);
        if doc.group == before {
            return Ok(0);
        }

        let students = serde_json::to_string(&doc.group.students)?;
        let changed = tx.execute(
            "UPDATE classes SET class_name = ?, branch = ?, students = ?, updated_at = ?
             WHERE id = ?",
            (
                &doc.group.class_name,
                &doc.group.branch,
                &students,
                now(),
                id,
            ),
        )?;
        tx.commit()?;
        Ok(changed)
    }
}
