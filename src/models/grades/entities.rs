use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分阶段，按时间顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "grade.ts")]
pub enum Term {
    Prelim,
    Midterm,
    SemiFinal,
    Final,
}

impl Term {
    pub const ALL: [Term; 4] = [Term::Prelim, Term::Midterm, Term::SemiFinal, Term::Final];

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Prelim => "prelim",
            Term::Midterm => "midterm",
            Term::SemiFinal => "semi_final",
            Term::Final => "final",
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 四个阶段的原始成绩，1.0 最好，5.0 不及格
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct RawGrades {
    #[serde(default)]
    pub prelim: Option<f64>,
    #[serde(default)]
    pub midterm: Option<f64>,
    #[serde(default)]
    pub semi_final: Option<f64>,
    #[serde(default, rename = "final")]
    #[ts(rename = "final")]
    pub final_term: Option<f64>,
}

impl RawGrades {
    pub fn get(&self, term: Term) -> Option<f64> {
        match term {
            Term::Prelim => self.prelim,
            Term::Midterm => self.midterm,
            Term::SemiFinal => self.semi_final,
            Term::Final => self.final_term,
        }
    }

    pub fn set(&mut self, term: Term, value: Option<f64>) {
        match term {
            Term::Prelim => self.prelim = value,
            Term::Midterm => self.midterm = value,
            Term::SemiFinal => self.semi_final = value,
            Term::Final => self.final_term = value,
        }
    }

    /// 只包含一个阶段的成绩
    pub fn only(term: Term, value: f64) -> Self {
        let mut grades = Self::default();
        grades.set(term, Some(value));
        grades
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub enum GradeStatus {
    Passed,
    Failed,
}

/// 累计成绩（派生值，不落库）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct CumulativeGrade {
    pub prelim: Option<f64>,
    pub midterm: Option<f64>,
    pub semi_final: Option<f64>,
    #[serde(rename = "final")]
    #[ts(rename = "final")]
    pub final_term: Option<f64>,
    pub status: Option<GradeStatus>,
}

// 成绩记录，每个 (学生, 科目) 至多一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "grade.ts")]
pub struct GradeRecord {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub grades: RawGrades,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_wire_names() {
        assert_eq!(serde_json::to_string(&Term::SemiFinal).unwrap(), "\"semi_final\"");
        let term: Term = serde_json::from_str("\"final\"").unwrap();
        assert_eq!(term, Term::Final);
    }

    #[test]
    fn test_raw_grades_final_field() {
        let raw: RawGrades = serde_json::from_str(r#"{"prelim":1.5,"final":2.0}"#).unwrap();
        assert_eq!(raw.prelim, Some(1.5));
        assert_eq!(raw.midterm, None);
        assert_eq!(raw.get(Term::Final), Some(2.0));
    }
}
