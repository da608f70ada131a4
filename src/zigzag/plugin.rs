//! Plugin identity, configuration and the registry that resolves plugins by id.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use log::{error, info};
use semver::{Version, VersionReq};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::data::{DataPlugin, FilePlugin, GenPlugin};
use super::error::PluginError;
use super::layout::{ForceLayout, LayoutPlugin};
use super::render::{CanvasRender, HeadlessRender, RenderPlugin};

/// A non-`Send` boxed future; everything here runs on the browser's single thread.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// API version implemented by every built-in plugin category.
pub const API_VERSION: Version = Version::new(1, 0, 0);

/// Identity shared by all plugin categories.
pub trait Plugin {
	/// Fully qualified plugin id, checked against the requested id on resolution.
	fn id(&self) -> &str;

	/// Version of the category API the plugin implements.
	fn api_version(&self) -> Version {
		API_VERSION
	}
}

/// Configuration record used to resolve one plugin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PluginConfig {
	/// Range the plugin's API version must satisfy.
	pub api_version_required: VersionReq,
	/// Registry key, e.g. `force`.
	pub id: String,
	/// Plugin specific fields.
	#[serde(flatten)]
	pub settings: Map<String, Value>,
}

impl PluginConfig {
	/// Requests `id` at API `^1.0` with no settings.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			api_version_required: VersionReq::parse("^1.0").unwrap_or(VersionReq::STAR),
			id: id.into(),
			settings: Map::new(),
		}
	}

	/// Adds one setting.
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.settings.insert(key.to_owned(), value.into());
		self
	}

	/// Decode the plugin specific fields into a typed settings struct.
	pub fn settings<T: DeserializeOwned>(&self) -> Result<T, PluginError> {
		serde_json::from_value(Value::Object(self.settings.clone())).map_err(|source| {
			PluginError::InvalidConfig {
				id: self.id.clone(),
				source,
			}
		})
	}
}

type Factory<P> = Box<dyn Fn(&PluginConfig) -> Result<Box<P>, PluginError>>;

/// Maps plugin ids to factories, one table per category.
#[derive(Default)]
pub struct Registry {
	data: HashMap<String, Factory<dyn DataPlugin>>,
	layout: HashMap<String, Factory<dyn LayoutPlugin>>,
	render: HashMap<String, Factory<dyn RenderPlugin>>,
}

impl Registry {
	/// An empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding every plugin shipped with the crate.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register_data(FilePlugin::ID, |config| {
			Ok(Box::new(FilePlugin::new(config.settings()?)))
		});
		registry.register_data(GenPlugin::ID, |config| {
			Ok(Box::new(GenPlugin::new(config.settings()?)))
		});
		registry.register_layout(ForceLayout::ID, |config| {
			Ok(Box::new(ForceLayout::new(config.settings()?)))
		});
		registry.register_render(CanvasRender::ID, |_| Ok(Box::new(CanvasRender::new())));
		registry.register_render(HeadlessRender::ID, |_| Ok(Box::new(HeadlessRender::new())));
		registry
	}

	/// Registers a data plugin factory, replacing any under the same id.
	pub fn register_data<F>(&mut self, id: &str, factory: F)
	where
		F: Fn(&PluginConfig) -> Result<Box<dyn DataPlugin>, PluginError> + 'static,
	{
		self.data.insert(id.to_owned(), Box::new(factory));
	}

	/// Registers a layout plugin factory.
	pub fn register_layout<F>(&mut self, id: &str, factory: F)
	where
		F: Fn(&PluginConfig) -> Result<Box<dyn LayoutPlugin>, PluginError> + 'static,
	{
		self.layout.insert(id.to_owned(), Box::new(factory));
	}

	/// Registers a render plugin factory.
	pub fn register_render<F>(&mut self, id: &str, factory: F)
	where
		F: Fn(&PluginConfig) -> Result<Box<dyn RenderPlugin>, PluginError> + 'static,
	{
		self.render.insert(id.to_owned(), Box::new(factory));
	}

	/// Builds and verifies the data plugin `config` asks for.
	pub async fn data(&self, config: &PluginConfig) -> Result<Box<dyn DataPlugin>, PluginError> {
		resolve("data", &self.data, config)
	}

	/// Builds and verifies the layout plugin `config` asks for.
	pub async fn layout(
		&self,
		config: &PluginConfig,
	) -> Result<Box<dyn LayoutPlugin>, PluginError> {
		resolve("layout", &self.layout, config)
	}

	/// Builds and verifies the render plugin `config` asks for.
	pub async fn render(
		&self,
		config: &PluginConfig,
	) -> Result<Box<dyn RenderPlugin>, PluginError> {
		resolve("render", &self.render, config)
	}
}

fn resolve<P: Plugin + ?Sized>(
	category: &'static str,
	factories: &HashMap<String, Factory<P>>,
	config: &PluginConfig,
) -> Result<Box<P>, PluginError> {
	let result = factories
		.get(&config.id)
		.ok_or_else(|| PluginError::NotFound {
			category,
			id: config.id.clone(),
		})
		.and_then(|factory| factory(config))
		.and_then(|plugin| verify(plugin, config));
	match &result {
		Ok(_) => info!("loaded {category} plugin `{}`", config.id),
		Err(e) => error!("unable to load {category} plugin `{}`: {e}", config.id),
	}
	result
}

fn verify<P: Plugin + ?Sized>(plugin: Box<P>, config: &PluginConfig) -> Result<Box<P>, PluginError> {
	if plugin.id() != config.id {
		return Err(PluginError::IdentityMismatch {
			expected: config.id.clone(),
			found: plugin.id().to_owned(),
		});
	}
	let provided = plugin.api_version();
	if !config.api_version_required.matches(&provided) {
		return Err(PluginError::VersionMismatch {
			id: config.id.clone(),
			provided,
			required: config.api_version_required.clone(),
		});
	}
	Ok(plugin)
}
