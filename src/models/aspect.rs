use once_cell::sync::Lazy;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;

pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Framing metadata for one `width:height` ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AspectRatioProfile {
    pub composition: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub dimensions: Option<(u32, u32)>,
    pub cinematic: Cow<'static, str>,
}

impl AspectRatioProfile {
    const fn known(
        composition: &'static str,
        description: &'static str,
        width: u32,
        height: u32,
        cinematic: &'static str,
    ) -> Self {
        Self {
            composition: Cow::Borrowed(composition),
            description: Cow::Borrowed(description),
            dimensions: Some((width, height)),
            cinematic: Cow::Borrowed(cinematic),
        }
    }

    /// Generic profile for a ratio missing from the table.
    pub fn fallback(ratio: &str) -> Self {
        Self {
            composition: Cow::Borrowed("square"),
            description: Cow::Owned(format!("{} aspect ratio", ratio)),
            dimensions: None,
            cinematic: Cow::Owned(format!("{} composition", ratio)),
        }
    }

    pub fn pixel_dimensions(&self) -> Option<String> {
        self.dimensions
            .map(|(width, height)| format!("{}×{} pixels", width, height))
    }
}

static ASPECT_RATIOS: [(&str, AspectRatioProfile); 10] = [
    ("1:1", AspectRatioProfile::known("square", "square format (1024×1024 pixels)", 1024, 1024, "centered square composition")),
    ("2:3", AspectRatioProfile::known("portrait", "portrait format (832×1248 pixels)", 832, 1248, "vertical portrait composition")),
    ("3:2", AspectRatioProfile::known("landscape", "landscape format (1248×832 pixels)", 1248, 832, "horizontal landscape composition")),
    ("3:4", AspectRatioProfile::known("portrait", "portrait format (864×1184 pixels)", 864, 1184, "vertical portrait composition")),
    ("4:3", AspectRatioProfile::known("landscape", "landscape format (1184×864 pixels)", 1184, 864, "classic landscape composition")),
    ("4:5", AspectRatioProfile::known("portrait", "portrait format (896×1152 pixels)", 896, 1152, "vertical portrait composition")),
    ("5:4", AspectRatioProfile::known("landscape", "landscape format (1152×896 pixels)", 1152, 896, "horizontal landscape composition")),
    ("9:16", AspectRatioProfile::known("portrait", "portrait format (768×1344 pixels)", 768, 1344, "vertical portrait orientation")),
    ("16:9", AspectRatioProfile::known("widescreen", "widescreen landscape format (1344×768 pixels)", 1344, 768, "cinematic widescreen shot")),
    ("21:9", AspectRatioProfile::known("ultrawide", "ultra-wide format (1536×672 pixels)", 1536, 672, "cinematic ultra-wide shot")),
];

static PROFILES: Lazy<HashMap<&'static str, &'static AspectRatioProfile>> = Lazy::new(|| {
    ASPECT_RATIOS
        .iter()
        .map(|(ratio, profile)| (*ratio, profile))
        .collect()
});

pub fn lookup(ratio: &str) -> Option<&'static AspectRatioProfile> {
    PROFILES.get(ratio.trim()).copied()
}

/// Table entry for `ratio`, or the generic fallback.
pub fn profile_for(ratio: &str) -> Cow<'static, AspectRatioProfile> {
    match lookup(ratio) {
        Some(profile) => Cow::Borrowed(profile),
        None => Cow::Owned(AspectRatioProfile::fallback(ratio)),
    }
}

/// Supported ratios in display order, paired with their descriptions.
pub fn supported_ratios() -> Vec<(&'static str, &'static str)> {
    ASPECT_RATIOS
        .iter()
        .map(|(ratio, profile)| (*ratio, &*profile.description))
        .collect()
}
