#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryLabels {
    pub platform: String,
    pub kind: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl TelemetryLabels {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Metric tags, platform first.
    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags = Vec::with_capacity(2 + self.extra.len());
        tags.push(("platform".into(), self.platform.clone()));
        if let Some(kind) = &self.kind {
            tags.push(("kind".into(), kind.clone()));
        }
        for (key, value) in &self.extra {
            tags.push((key.clone(), value.clone()));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_keep_insertion_order() {
        let labels = TelemetryLabels::new("messenger")
            .with_kind("text")
            .with_extra("outcome", "ok");
        assert_eq!(
            labels.tags(),
            vec![
                ("platform".to_string(), "messenger".to_string()),
                ("kind".to_string(), "text".to_string()),
                ("outcome".to_string(), "ok".to_string()),
            ]
        );
    }
}
