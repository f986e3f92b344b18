use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use log::debug;

use crate::{
    seed, Budget, Collection, Config, DateTime, Error, Map, Query, Record, Source, Templates, View,
};

// Used for configured collections that don't provide their own template.
const GENERIC_TEMPLATE: &str = "{{#each this}}{{@key}}: {{this}}\n{{/each}}";

/// Execution context for ACES Hub: all of the loaded collections, the views
/// through which they can be filtered, and the templates through which
/// filtered views are rendered.
pub struct Hub<'a> {
    collections: Map<String, Collection>,
    views: Map<String, View>,
    templates: Templates<'a>,
    budget: Option<Budget>,
}

impl<'a> Hub<'a> {
    /// A hub with no collections.
    pub fn empty() -> Self {
        Self {
            collections: Map::new(),
            views: Map::new(),
            templates: Templates::default(),
            budget: None,
        }
    }

    /// A hub populated with the built-in dashboard data.
    pub fn seeded() -> Result<Self> {
        let mut hub = Self::empty();
        hub.register(
            seed::members()?,
            seed::members_view(),
            include_str!("../templates/members.hbs"),
            "No members found.",
        )?;
        hub.register(
            seed::events()?,
            seed::events_view(),
            include_str!("../templates/events.hbs"),
            "No events found.",
        )?;
        hub.register(
            seed::announcements()?,
            seed::announcements_view(),
            include_str!("../templates/announcements.hbs"),
            "No announcements found.",
        )?;
        hub.register(
            seed::transactions()?,
            seed::transactions_view(),
            include_str!("../templates/transactions.hbs"),
            "No transactions found.",
        )?;
        hub.budget = Some(seed::budget()?);
        debug!("Loaded built-in dashboard data");
        Ok(hub)
    }

    /// Load the hub described by the given configuration file, or fall back
    /// to the built-in data if there is no such file.
    pub fn load<P: AsRef<Path>>(maybe_config_file: P) -> Result<Self> {
        let maybe_config_file = maybe_config_file.as_ref();
        debug!(
            "Attempting to load config file: {}",
            maybe_config_file.display()
        );
        if maybe_config_file.is_file() {
            let config = Config::load_from_file(maybe_config_file)?;
            debug!("Loaded configuration from {}", maybe_config_file.display());
            Self::from_config(&config)
        } else {
            debug!(
                "No such configuration file, using built-in data: {}",
                maybe_config_file.display()
            );
            Self::seeded()
        }
    }

    /// Build a hub from the given configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut hub = Self::empty();
        for (name, cc) in &config.collections {
            let collection = Collection::load(name, &Source::Files(cc.source.clone()))
                .wrap_err_with(|| format!("failed to load collection \"{}\"", name))?;
            let template = match &cc.template {
                Some(path) => fs::read_to_string(path).map_err(|e| {
                    Error::Io(format!("while reading template {}", path.display()), e)
                })?,
                None => GENERIC_TEMPLATE.to_string(),
            };
            let empty = cc
                .empty
                .clone()
                .unwrap_or_else(|| format!("No {} found.", name));
            hub.register(collection, cc.view.clone(), template, empty)?;
        }
        if let Some(path) = &config.budget {
            hub.budget = Some(Budget::load_from_file(path)?);
        }
        Ok(hub)
    }

    /// Adds the given collection to the hub along with its view and template,
    /// returning an error if a collection with the same name already exists.
    pub fn register<T, E>(
        &mut self,
        collection: Collection,
        view: View,
        template: T,
        empty: E,
    ) -> Result<()>
    where
        T: AsRef<str>,
        E: AsRef<str>,
    {
        let name = collection.name().to_string();
        if self.collections.contains_key(&name) {
            return Err(Error::CollectionAlreadyExists(name).into());
        }
        self.templates.register(&name, template, empty)?;
        self.views.insert(name.clone(), view);
        self.collections.insert(name.clone(), collection);
        debug!("Registered collection {}", name);
        Ok(())
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn collection(&self, name: &str) -> Result<&Collection, Error> {
        self.collections
            .get(name)
            .ok_or_else(|| Error::NoSuchCollection(name.to_string()))
    }

    pub fn view(&self, name: &str) -> Result<&View, Error> {
        self.views
            .get(name)
            .ok_or_else(|| Error::NoSuchCollection(name.to_string()))
    }

    pub fn budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }

    /// Filter the named collection through its view.
    pub fn filter(&self, name: &str, query: &Query, now: DateTime) -> Result<Vec<&Record>, Error> {
        let collection = self.collection(name)?;
        let view = self.view(name)?;
        Ok(view.filter(collection, query, now))
    }

    /// Filter the named collection and render the results through its
    /// template.
    pub fn render(&self, name: &str, query: &Query, now: DateTime) -> Result<String> {
        let records = self.filter(name, query, now)?;
        self.templates.render_records(name, &records)
    }
}
