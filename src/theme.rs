//! Template palettes.
//!
//! Each [`Template`] maps to a fixed palette and font pair. The palette is
//! emitted as CSS custom properties on `:root`; the stylesheets in `static/`
//! only ever reference the variables, never literal colors.

use crate::types::Template;

/// Colors and fonts of one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateTheme {
    pub accent: &'static str,
    pub accent_strong: &'static str,
    pub accent_soft: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub muted_light: &'static str,
    pub page_background: &'static str,
    pub surface: &'static str,
    pub surface_alt: &'static str,
    pub border: &'static str,
    pub highlight: &'static str,
    /// Start and end color of the title page gradient.
    pub cover_gradient: (&'static str, &'static str),
    pub cover_text: &'static str,
    pub heading_font: &'static str,
    pub body_font: &'static str,
}

const CLASSIC: TemplateTheme = TemplateTheme {
    accent: "#ff9f5a",
    accent_strong: "#ff8c42",
    accent_soft: "#ffe0c7",
    text: "#1f2937",
    muted: "#6b7280",
    muted_light: "#9ca3af",
    page_background: "#f3f4f6",
    surface: "#ffffff",
    surface_alt: "#fdf8f3",
    border: "#e5e7eb",
    highlight: "#fff4e5",
    cover_gradient: ("#2b1a12", "#ff9f5a"),
    cover_text: "#ffffff",
    heading_font: "'Playfair Display', 'Times New Roman', serif",
    body_font: "'Cormorant Garamond', 'Georgia', serif",
};

const MODERN: TemplateTheme = TemplateTheme {
    accent: "#38bdf8",
    accent_strong: "#0ea5e9",
    accent_soft: "#dbeafe",
    text: "#0f172a",
    muted: "#475569",
    muted_light: "#94a3b8",
    page_background: "#e2e8f0",
    surface: "#ffffff",
    surface_alt: "#f8fafc",
    border: "#cbd5f5",
    highlight: "#e0f2fe",
    cover_gradient: ("#0f172a", "#1d4ed8"),
    cover_text: "#f8fafc",
    heading_font: "'Poppins', 'Inter', 'Segoe UI', sans-serif",
    body_font: "'Inter', 'Helvetica Neue', sans-serif",
};

const ROMANTIC: TemplateTheme = TemplateTheme {
    accent: "#f472b6",
    accent_strong: "#ec4899",
    accent_soft: "#fbcfe8",
    text: "#4a1d32",
    muted: "#9d4b73",
    muted_light: "#d68fb4",
    page_background: "#fff5f8",
    surface: "#ffffff",
    surface_alt: "#fff0f7",
    border: "#f9c6dd",
    highlight: "#ffe4ef",
    cover_gradient: ("#f472b6", "#fda4af"),
    cover_text: "#ffffff",
    heading_font: "'Cormorant Garamond', 'Georgia', serif",
    body_font: "'Source Sans Pro', 'Helvetica Neue', sans-serif",
};

const ADVENTURE: TemplateTheme = TemplateTheme {
    accent: "#f97316",
    accent_strong: "#ea580c",
    accent_soft: "#fed7aa",
    text: "#2b1b14",
    muted: "#7c4a2d",
    muted_light: "#c05621",
    page_background: "#f3f0ea",
    surface: "#ffffff",
    surface_alt: "#fef3c7",
    border: "#fcd34d",
    highlight: "#fff7ed",
    cover_gradient: ("#1e3a8a", "#f97316"),
    cover_text: "#ffffff",
    heading_font: "'Oswald', 'Montserrat', 'Arial', sans-serif",
    body_font: "'Nunito', 'Helvetica Neue', sans-serif",
};

const MINIMAL: TemplateTheme = TemplateTheme {
    accent: "#10b981",
    accent_strong: "#059669",
    accent_soft: "#d1fae5",
    text: "#111827",
    muted: "#6b7280",
    muted_light: "#94a3b8",
    page_background: "#f6f6f4",
    surface: "#ffffff",
    surface_alt: "#f4f4f1",
    border: "#e5e7eb",
    highlight: "#e0f2f1",
    cover_gradient: ("#0f172a", "#10b981"),
    cover_text: "#ffffff",
    heading_font: "'IBM Plex Sans', 'Inter', 'Segoe UI', sans-serif",
    body_font: "'Inter', 'Segoe UI', sans-serif",
};

impl TemplateTheme {
    pub fn for_template(template: Template) -> &'static TemplateTheme {
        match template {
            Template::Classic => &CLASSIC,
            Template::Modern => &MODERN,
            Template::Romantic => &ROMANTIC,
            Template::Adventure => &ADVENTURE,
            Template::Minimal => &MINIMAL,
        }
    }

    /// Background of a title page without a cover photo.
    pub fn cover_background(&self) -> String {
        format!(
            "linear-gradient(135deg, {} 0%, {} 100%)",
            self.cover_gradient.0, self.cover_gradient.1
        )
    }
}

/// Generate CSS custom properties from a template palette.
pub fn generate_theme_css(theme: &TemplateTheme) -> String {
    format!(
        r#":root {{
    --accent: {accent};
    --accent-strong: {accent_strong};
    --accent-soft: {accent_soft};
    --text: {text};
    --muted: {muted};
    --muted-light: {muted_light};
    --page-background: {page_background};
    --surface: {surface};
    --surface-alt: {surface_alt};
    --border: {border};
    --highlight: {highlight};
    --cover-background: {cover_background};
    --cover-text: {cover_text};
    --heading-font: {heading_font};
    --body-font: {body_font};
}}"#,
        accent = theme.accent,
        accent_strong = theme.accent_strong,
        accent_soft = theme.accent_soft,
        text = theme.text,
        muted = theme.muted,
        muted_light = theme.muted_light,
        page_background = theme.page_background,
        surface = theme.surface,
        surface_alt = theme.surface_alt,
        border = theme.border,
        highlight = theme.highlight,
        cover_background = theme.cover_background(),
        cover_text = theme.cover_text,
        heading_font = theme.heading_font,
        body_font = theme.body_font,
    )
}
