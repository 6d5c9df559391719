//! Projection of a [`WeatherResult`] onto a rendering surface.

use maud::html;
use serde::{Deserialize, Serialize};

use crate::model::WeatherResult;

pub const UNAVAILABLE: &str = "Weather unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Text,
    Html,
}

impl DisplayFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayFormat::Text => "text",
            DisplayFormat::Html => "html",
        }
    }

    pub const fn all() -> &'static [DisplayFormat] {
        &[DisplayFormat::Text, DisplayFormat::Html]
    }
}

impl std::fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A surface whose content can be replaced wholesale.
pub trait Renderer {
    fn replace_content(&mut self, fragment: &str);
}

impl Renderer for String {
    fn replace_content(&mut self, fragment: &str) {
        self.clear();
        self.push_str(fragment);
    }
}

/// Pure: the same result and format always give the same bytes.
pub fn render(result: &WeatherResult, format: DisplayFormat) -> String {
    match (result, format) {
        (WeatherResult::Resolved { place, temperature }, DisplayFormat::Text) => {
            format!("Location: {place}\nTemperature: {temperature}")
        }
        (WeatherResult::Resolved { place, temperature }, DisplayFormat::Html) => html! {
            p { "Location: " (place.as_str()) }
            "\n"
            p { "Temperature: " (temperature.to_string()) }
        }
        .into_string(),
        (WeatherResult::Failed { .. }, DisplayFormat::Text) => UNAVAILABLE.to_string(),
        (WeatherResult::Failed { .. }, DisplayFormat::Html) => {
            html! { p { (UNAVAILABLE) } }.into_string()
        }
    }
}

/// The display sink: renders results into the surface it owns.
#[derive(Debug)]
pub struct DisplaySink<R> {
    surface: R,
    format: DisplayFormat,
}

impl<R: Renderer> DisplaySink<R> {
    pub fn new(surface: R, format: DisplayFormat) -> Self {
        Self { surface, format }
    }

    pub fn show(&mut self, result: &WeatherResult) {
        let fragment = render(result, self.format);
        self.surface.replace_content(&fragment);
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }
}
