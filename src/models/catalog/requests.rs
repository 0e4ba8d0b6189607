use serde::Deserialize;
use ts_rs::TS;

use super::entities::Course;
use crate::errors::{LmsError, Result};
use crate::utils::multipart::MultipartForm;

/// 课程写入的存储层输入，slug 和折后价由存储层计算
#[derive(Debug, Clone)]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration: String,
    pub requirements: String,
    pub content: String,
    pub list_price: f64,
    pub discount: f64,
    pub thumbnail: Option<String>,
    pub featured_video: Option<String>,
    pub instructor_id: i64,
}

/// 课程表单（multipart），编辑时缺省字段保持原值
#[derive(Debug, Clone, Default)]
pub struct CourseForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<i64>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub requirements: Option<String>,
    pub content: Option<String>,
}

impl CourseForm {
    pub fn from_multipart(form: &MultipartForm) -> Result<Self> {
        let price = form.parse::<f64>("price")?;
        let discount = form.parse::<f64>("discount")?;

        if let Some(price) = price
            && (!price.is_finite() || price < 0.0)
        {
            return Err(LmsError::validation("Price must be a non-negative number."));
        }
        if let Some(discount) = discount
            && !(0.0..=100.0).contains(&discount)
        {
            return Err(LmsError::validation("Discount must be between 0 and 100."));
        }

        Ok(Self {
            title: form.text("title").map(str::to_string),
            description: form.text("description").map(str::to_string),
            instructor: form.parse::<i64>("instructor")?,
            duration: form.text("duration").map(str::to_string),
            level: form.text("level").map(str::to_string),
            category: form.text("category").map(str::to_string),
            price,
            discount,
            requirements: form.text("requirements").map(str::to_string),
            content: form.text("content").map(str::to_string),
        })
    }
}

/// 新建课程时的默认值
pub const DEFAULT_LEVEL: &str = "Beginner";
pub const DEFAULT_DURATION: &str = "0 Hours";
pub const DEFAULT_CATEGORY: &str = "uncategorized";

impl CourseForm {
    /// 合并为存储层输入
    ///
    /// 编辑时（`existing` 为 Some）缺省字段沿用原值，新建时标题必填。
    /// 原价和折扣总是一起写入，折后价由存储层重新计算。
    pub fn into_input(
        self,
        existing: Option<&Course>,
        instructor_id: i64,
        thumbnail: Option<String>,
        featured_video: Option<String>,
    ) -> Result<CourseInput> {
        let title = match (self.title, existing) {
            (Some(title), _) => title,
            (None, Some(course)) => course.title.clone(),
            (None, None) => return Err(LmsError::validation("Please fill all required fields.")),
        };

        fn keep(
            value: Option<String>,
            existing: Option<&Course>,
            old: fn(&Course) -> &String,
            default: &str,
        ) -> String {
            value.unwrap_or_else(|| {
                existing
                    .map(|c| old(c).clone())
                    .unwrap_or_else(|| default.to_string())
            })
        }

        Ok(CourseInput {
            title,
            description: keep(self.description, existing, |c| &c.description, ""),
            category: keep(self.category, existing, |c| &c.category, DEFAULT_CATEGORY),
            level: keep(self.level, existing, |c| &c.level, DEFAULT_LEVEL),
            duration: keep(self.duration, existing, |c| &c.duration, DEFAULT_DURATION),
            requirements: keep(self.requirements, existing, |c| &c.requirements, ""),
            content: keep(self.content, existing, |c| &c.content, ""),
            list_price: self
                .price
                .or_else(|| existing.map(|c| c.list_price))
                .unwrap_or(0.0),
            discount: self
                .discount
                .or_else(|| existing.map(|c| c.discount))
                .unwrap_or(0.0),
            thumbnail: thumbnail.or_else(|| existing.and_then(|c| c.thumbnail.clone())),
            featured_video: featured_video
                .or_else(|| existing.and_then(|c| c.featured_video.clone())),
            instructor_id,
        })
    }
}

/// 视频表单（multipart）
#[derive(Debug, Clone, Default)]
pub struct VideoForm {
    pub title: Option<String>,
    pub order: Option<i32>,
}

impl VideoForm {
    pub fn from_multipart(form: &MultipartForm) -> Result<Self> {
        Ok(Self {
            title: form.text("title").map(str::to_string),
            order: form.parse::<i32>("order")?,
        })
    }
}

/// 视频写入的存储层输入
#[derive(Debug, Clone)]
pub struct VideoInput {
    pub title: String,
    pub video: Option<String>,
    pub order: i32,
}

// 联系方式表单，空白视为未填写
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct ContactForm {
    pub whatsapp: Option<String>,
    pub microsoft_teams: Option<String>,
    pub skype: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactForm {
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            whatsapp: clean(self.whatsapp),
            microsoft_teams: clean(self.microsoft_teams),
            skype: clean(self.skype),
            email: clean(self.email),
            phone: clean(self.phone),
        }
    }
}

// 分配教练表单
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct AssignTrainerForm {
    pub trainer: i64,
    pub course: i64,
}

// 教练分配管理页中的分配表单
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct TrainerCourseForm {
    #[serde(default, deserialize_with = "crate::utils::form::empty_string_as_none")]
    pub course: Option<i64>,
}

// 课程列表查询
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "catalog.ts")]
pub struct CourseListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_blank_fields_become_none() {
        let form = ContactForm {
            whatsapp: Some("  +91 99999 ".into()),
            microsoft_teams: Some("   ".into()),
            skype: None,
            email: Some("".into()),
            phone: Some("123".into()),
        }
        .normalized();

        assert_eq!(form.whatsapp.as_deref(), Some("+91 99999"));
        assert!(form.microsoft_teams.is_none());
        assert!(form.email.is_none());
        assert_eq!(form.phone.as_deref(), Some("123"));
    }

    #[test]
    fn test_course_form_rejects_bad_discount() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "Intro");
        form.insert_text("discount", "120");
        assert!(CourseForm::from_multipart(&form).is_err());
    }

    fn sample_course() -> Course {
        let now = chrono::Utc::now();
        Course {
            id: 1,
            title: "Intro".into(),
            slug: "intro".into(),
            description: "Basics".into(),
            category: "Programming".into(),
            level: "Advanced".into(),
            duration: "4 Hours".into(),
            requirements: String::new(),
            content: String::new(),
            list_price: 100.0,
            discount: 20.0,
            price: 80.0,
            thumbnail: Some("images/a.png".into()),
            featured_video: None,
            instructor_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_course_requires_title_and_uses_defaults() {
        assert!(CourseForm::default().into_input(None, 1, None, None).is_err());

        let input = CourseForm {
            title: Some("Rust".into()),
            ..Default::default()
        }
        .into_input(None, 3, None, None)
        .expect("valid input");
        assert_eq!(input.level, DEFAULT_LEVEL);
        assert_eq!(input.duration, DEFAULT_DURATION);
        assert_eq!(input.category, DEFAULT_CATEGORY);
        assert_eq!(input.list_price, 0.0);
        assert_eq!(input.instructor_id, 3);
    }

    #[test]
    fn test_edit_keeps_missing_fields() {
        let course = sample_course();
        let input = CourseForm {
            discount: Some(50.0),
            ..Default::default()
        }
        .into_input(Some(&course), course.instructor_id, None, None)
        .expect("valid input");
        assert_eq!(input.title, "Intro");
        assert_eq!(input.level, "Advanced");
        assert_eq!(input.list_price, 100.0);
        assert_eq!(input.discount, 50.0);
        assert_eq!(input.thumbnail.as_deref(), Some("images/a.png"));
    }

    #[test]
    fn test_course_form_parses_numbers() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "Intro");
        form.insert_text("price", "100");
        form.insert_text("discount", "20");
        form.insert_text("instructor", "");

        let parsed = CourseForm::from_multipart(&form).expect("valid form");
        assert_eq!(parsed.price, Some(100.0));
        assert_eq!(parsed.discount, Some(20.0));
        assert_eq!(parsed.instructor, None);
    }
}
