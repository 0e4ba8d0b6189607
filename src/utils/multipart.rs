//! multipart 表单解析
//!
//! 文本字段收集到内存，文件字段流式写入 `upload.dir/<kind>/<timestamp>-<uuid>.<ext>`。

use actix_multipart::Multipart;
use futures_util::{StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::{LmsError, Result};

/// 上传文件的类别，决定扩展名白名单和存放子目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Video,
    Image,
}

impl UploadKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Video => "videos",
            UploadKind::Image => "images",
        }
    }

    fn allowed<'a>(&self, config: &'a UploadConfig) -> &'a [String] {
        match self {
            UploadKind::Video => &config.allowed_video_types,
            UploadKind::Image => &config.allowed_image_types,
        }
    }

    /// 校验扩展名，返回小写扩展名
    pub fn check_extension(&self, config: &UploadConfig, file_name: &str) -> Result<String> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let allowed = self.allowed(config);
        if extension.is_empty() || !allowed.iter().any(|t| t.eq_ignore_ascii_case(&extension)) {
            return Err(LmsError::validation(format!(
                "File type not allowed. Allowed types: {}",
                allowed.join(", ")
            )));
        }
        Ok(extension)
    }
}

/// 已保存的上传文件
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    /// 相对于上传目录的路径，即媒体引用
    pub reference: String,
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, StoredFile>,
}

impl MultipartForm {
    /// 读取整个 multipart 请求体，`file_fields` 声明允许的文件字段及其类别
    pub async fn from_payload(
        mut payload: Multipart,
        config: &UploadConfig,
        file_fields: &[(&str, UploadKind)],
    ) -> Result<Self> {
        let mut form = MultipartForm::default();

        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| LmsError::validation(format!("Invalid multipart payload: {e}")))?
        {
            let content_disposition = field.content_disposition();
            let name = content_disposition
                .and_then(|cd| cd.get_name())
                .unwrap_or_default()
                .to_string();
            let file_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string());

            let kind = file_fields
                .iter()
                .find(|(field_name, _)| *field_name == name)
                .map(|(_, kind)| *kind);

            match (kind, file_name) {
                (Some(kind), Some(original_name)) => {
                    // 浏览器对未选择文件的输入框也会提交一个空文件名的字段
                    if original_name.is_empty() {
                        while field.next().await.is_some() {}
                        continue;
                    }

                    let extension = match kind.check_extension(config, &original_name) {
                        Ok(ext) => ext,
                        Err(e) => {
                            form.discard_files();
                            return Err(e);
                        }
                    };

                    let dir = Path::new(&config.dir).join(kind.dir_name());
                    fs::create_dir_all(&dir)?;
                    let stored_name = format!(
                        "{}-{}.{}",
                        chrono::Utc::now().timestamp(),
                        Uuid::new_v4(),
                        extension
                    );
                    let file_path = dir.join(&stored_name);
                    let mut f = File::create(&file_path)?;

                    let mut total_size: usize = 0;
                    while let Some(chunk) = field.next().await {
                        let data = match chunk {
                            Ok(data) => data,
                            Err(e) => {
                                let _ = fs::remove_file(&file_path);
                                form.discard_files();
                                return Err(LmsError::file_operation(format!(
                                    "Failed to read upload: {e}"
                                )));
                            }
                        };
                        total_size += data.len();
                        if total_size > config.max_size {
                            let _ = fs::remove_file(&file_path);
                            form.discard_files();
                            return Err(LmsError::validation("File size exceeds the limit."));
                        }
                        f.write_all(&data)?;
                    }

                    form.files.insert(
                        name,
                        StoredFile {
                            original_name,
                            reference: format!("{}/{}", kind.dir_name(), stored_name),
                            size: total_size,
                        },
                    );
                }
                _ => {
                    let mut value = Vec::new();
                    while let Some(chunk) = field.next().await {
                        let data = chunk.map_err(|e| {
                            LmsError::validation(format!("Invalid multipart field: {e}"))
                        })?;
                        value.extend_from_slice(&data);
                    }
                    let value = String::from_utf8(value).map_err(|_| {
                        LmsError::validation(format!("Field '{name}' is not valid UTF-8"))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// 文本字段，去除首尾空白，空值视为未填写
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
    {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| LmsError::validation(format!("Invalid value for '{name}'."))),
        }
    }

    pub fn file(&self, name: &str) -> Option<&StoredFile> {
        self.files.get(name)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// 表单校验失败时删除已经落盘的文件
    pub fn discard_files(&self) {
        let dir = &crate::config::AppConfig::get().upload.dir;
        for file in self.files.values() {
            let path = Path::new(dir).join(&file.reference);
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("Failed to remove discarded upload {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_config() -> UploadConfig {
        UploadConfig {
            dir: "media".into(),
            max_size: 1024,
            allowed_video_types: vec!["mp4".into(), "webm".into()],
            allowed_image_types: vec!["png".into(), "jpg".into()],
        }
    }

    #[test]
    fn test_check_extension() {
        let config = upload_config();
        assert_eq!(
            UploadKind::Video.check_extension(&config, "Lesson.MP4").ok(),
            Some("mp4".to_string())
        );
        assert!(UploadKind::Video.check_extension(&config, "cover.png").is_err());
        assert!(UploadKind::Image.check_extension(&config, "noext").is_err());
    }

    #[test]
    fn test_text_and_parse() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "  Intro  ");
        form.insert_text("order", "3");
        form.insert_text("blank", "   ");
        form.insert_text("bad", "x1");

        assert_eq!(form.text("title"), Some("Intro"));
        assert_eq!(form.text("blank"), None);
        assert_eq!(form.parse::<i32>("order").ok().flatten(), Some(3));
        assert_eq!(form.parse::<i32>("missing").ok().flatten(), None);
        assert!(form.parse::<i32>("bad").is_err());
        assert!(form.file("video").is_none());
    }
}
