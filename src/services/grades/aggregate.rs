//! 累计成绩计算
//!
//! 逐阶段滚动平均：每个阶段只与上一阶段的累计值取平均，
//! 缺失的阶段沿用上一阶段的累计值。这不是已录入阶段的算术平均。

use crate::models::grades::entities::{CumulativeGrade, GradeStatus, RawGrades};

/// 及格线，累计期末成绩达到或超过该值即为不及格（分数越低越好）
pub const FAILING_THRESHOLD: f64 = 3.0;

/// 由原始成绩计算累计成绩；prelim 缺失时全部为空
pub fn cumulative(raw: &RawGrades) -> CumulativeGrade {
    let Some(prelim) = raw.prelim else {
        return CumulativeGrade::default();
    };

    let midterm = blend(prelim, raw.midterm);
    let semi_final = blend(midterm, raw.semi_final);
    let final_term = blend(semi_final, raw.final_term);

    CumulativeGrade {
        prelim: Some(prelim),
        midterm: Some(midterm),
        semi_final: Some(semi_final),
        final_term: Some(final_term),
        status: Some(status_for(final_term)),
    }
}

fn blend(previous: f64, next: Option<f64>) -> f64 {
    match next {
        Some(value) => (previous + value) / 2.0,
        None => previous,
    }
}

pub fn status_for(final_term: f64) -> GradeStatus {
    if final_term >= FAILING_THRESHOLD {
        GradeStatus::Failed
    } else {
        GradeStatus::Passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(p: Option<f64>, m: Option<f64>, s: Option<f64>, f: Option<f64>) -> RawGrades {
        RawGrades {
            prelim: p,
            midterm: m,
            semi_final: s,
            final_term: f,
        }
    }

    #[test]
    fn test_prelim_only_carries_forward() {
        for value in [1.0, 2.25, 3.0, 5.0] {
            let result = cumulative(&raw(Some(value), None, None, None));
            assert_eq!(result.prelim, Some(value));
            assert_eq!(result.midterm, Some(value));
            assert_eq!(result.semi_final, Some(value));
            assert_eq!(result.final_term, Some(value));
            assert_eq!(result.status, Some(status_for(value)));
        }
    }

    #[test]
    fn test_threshold_is_failed() {
        let result = cumulative(&raw(Some(1.0), Some(5.0), None, None));
        assert_eq!(
            result,
            CumulativeGrade {
                prelim: Some(1.0),
                midterm: Some(3.0),
                semi_final: Some(3.0),
                final_term: Some(3.0),
                status: Some(GradeStatus::Failed),
            }
        );
    }

    #[test]
    fn test_all_excellent_passes() {
        let result = cumulative(&raw(Some(1.0), Some(1.0), Some(1.0), Some(1.0)));
        assert_eq!(result.final_term, Some(1.0));
        assert_eq!(result.status, Some(GradeStatus::Passed));
    }

    #[test]
    fn test_running_average_not_flat_mean() {
        // 2.0 -> (2+4)/2=3.0 -> (3+1)/2=2.0 -> (2+1)/2=1.5
        let result = cumulative(&raw(Some(2.0), Some(4.0), Some(1.0), Some(1.0)));
        assert_eq!(result.midterm, Some(3.0));
        assert_eq!(result.semi_final, Some(2.0));
        assert_eq!(result.final_term, Some(1.5));
        assert_ne!(result.final_term, Some(2.0));
    }

    #[test]
    fn test_gap_carries_previous_stage() {
        let result = cumulative(&raw(Some(2.0), None, Some(4.0), None));
        assert_eq!(result.midterm, Some(2.0));
        assert_eq!(result.semi_final, Some(3.0));
        assert_eq!(result.final_term, Some(3.0));
        assert_eq!(result.status, Some(GradeStatus::Failed));
    }

    #[test]
    fn test_missing_prelim_leaves_everything_empty() {
        let result = cumulative(&raw(None, Some(1.0), Some(1.0), Some(1.0)));
        assert_eq!(result, CumulativeGrade::default());
        assert_eq!(result.status, None);
    }
}
