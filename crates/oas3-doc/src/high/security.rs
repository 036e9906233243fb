use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  NodeBuilder, Renderable, lift_extensions, lift_object, lift_string, lift_string_map, line_of,
  node_builder::ref_value,
};
use crate::low::{self, NEW_FIELD_LINE};

#[derive(Debug, Clone, Default)]
pub struct OAuthFlow {
  pub authorization_url: Option<String>,
  pub token_url: Option<String>,
  pub refresh_url: Option<String>,
  pub scopes: IndexMap<String, String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::OAuthFlow>>,
}

impl OAuthFlow {
  #[must_use]
  pub fn from_value(low: &low::OAuthFlow, reference: Option<String>) -> Self {
    Self {
      authorization_url: lift_string(&low.authorization_url),
      token_url: lift_string(&low.token_url),
      refresh_url: lift_string(&low.refresh_url),
      scopes: lift_string_map(&low.scopes),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for OAuthFlow {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field(
      "authorizationUrl",
      line_of(low, |l| l.authorization_url.as_ref()),
      self.authorization_url.as_ref(),
    );
    nb.str_field("tokenUrl", line_of(low, |l| l.token_url.as_ref()), self.token_url.as_ref());
    nb.str_field("refreshUrl", line_of(low, |l| l.refresh_url.as_ref()), self.refresh_url.as_ref());
    nb.string_map(
      "scopes",
      line_of(low, |l| l.scopes.as_ref()),
      &self.scopes,
      low.and_then(|l| l.scopes.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct OAuthFlows {
  pub implicit: Option<OAuthFlow>,
  pub password: Option<OAuthFlow>,
  pub client_credentials: Option<OAuthFlow>,
  pub authorization_code: Option<OAuthFlow>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::OAuthFlows>>,
}

impl OAuthFlows {
  #[must_use]
  pub fn from_value(low: &low::OAuthFlows, reference: Option<String>) -> Self {
    Self {
      implicit: lift_object(&low.implicit, OAuthFlow::from_value),
      password: lift_object(&low.password, OAuthFlow::from_value),
      client_credentials: lift_object(&low.client_credentials, OAuthFlow::from_value),
      authorization_code: lift_object(&low.authorization_code, OAuthFlow::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for OAuthFlows {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.object(
      "implicit",
      line_of(low, |l| l.implicit.as_ref()),
      self.implicit.as_ref().map(|flow| flow as &dyn Renderable),
    );
    nb.object(
      "password",
      line_of(low, |l| l.password.as_ref()),
      self.password.as_ref().map(|flow| flow as &dyn Renderable),
    );
    nb.object(
      "clientCredentials",
      line_of(low, |l| l.client_credentials.as_ref()),
      self.client_credentials.as_ref().map(|flow| flow as &dyn Renderable),
    );
    nb.object(
      "authorizationCode",
      line_of(low, |l| l.authorization_code.as_ref()),
      self.authorization_code.as_ref().map(|flow| flow as &dyn Renderable),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityScheme {
  pub scheme_type: Option<String>,
  pub description: Option<String>,
  pub name: Option<String>,
  pub location: Option<String>,
  pub scheme: Option<String>,
  pub bearer_format: Option<String>,
  pub flows: Option<OAuthFlows>,
  pub open_id_connect_url: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::SecurityScheme>>,
}

impl SecurityScheme {
  #[must_use]
  pub fn from_value(low: &low::SecurityScheme, reference: Option<String>) -> Self {
    Self {
      scheme_type: lift_string(&low.scheme_type),
      description: lift_string(&low.description),
      name: lift_string(&low.name),
      location: lift_string(&low.location),
      scheme: lift_string(&low.scheme),
      bearer_format: lift_string(&low.bearer_format),
      flows: lift_object(&low.flows, OAuthFlows::from_value),
      open_id_connect_url: lift_string(&low.open_id_connect_url),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for SecurityScheme {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("type", line_of(low, |l| l.scheme_type.as_ref()), self.scheme_type.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.str_field("name", line_of(low, |l| l.name.as_ref()), self.name.as_ref());
    nb.str_field("in", line_of(low, |l| l.location.as_ref()), self.location.as_ref());
    nb.str_field("scheme", line_of(low, |l| l.scheme.as_ref()), self.scheme.as_ref());
    nb.str_field("bearerFormat", line_of(low, |l| l.bearer_format.as_ref()), self.bearer_format.as_ref());
    nb.object(
      "flows",
      line_of(low, |l| l.flows.as_ref()),
      self.flows.as_ref().map(|flows| flows as &dyn Renderable),
    );
    nb.str_field(
      "openIdConnectUrl",
      line_of(low, |l| l.open_id_connect_url.as_ref()),
      self.open_id_connect_url.as_ref(),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityRequirement {
  pub requirements: IndexMap<String, Vec<String>>,
  pub low: Option<Arc<low::SecurityRequirement>>,
}

impl SecurityRequirement {
  #[must_use]
  pub fn from_value(low: &low::SecurityRequirement, _reference: Option<String>) -> Self {
    Self {
      requirements: low
        .requirements
        .iter()
        .map(|(key, scopes)| {
          (
            key.value.clone(),
            scopes.value.iter().map(|scope| scope.value.clone()).collect(),
          )
        })
        .collect(),
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for SecurityRequirement {
  fn render(&self) -> Yaml {
    // scope lists are legitimately empty (`api_key: []`), so the hash is
    // assembled directly instead of going through the empty-container skip
    let low = self.low.as_deref();
    let mut ordered: Vec<(&String, &Vec<String>, u32)> = self
      .requirements
      .iter()
      .map(|(name, scopes)| {
        let line = low
          .and_then(|l| l.requirements.get_key_value(name.as_str()))
          .map_or(NEW_FIELD_LINE, |(key, _)| key.line);
        (name, scopes, line)
      })
      .collect();
    ordered.sort_by_key(|(_, _, line)| *line);

    let mut hash = yaml_rust2::yaml::Hash::new();
    for (name, scopes, _) in ordered {
      hash.insert(
        Yaml::String(name.clone()),
        Yaml::Array(scopes.iter().map(|scope| Yaml::String(scope.clone())).collect()),
      );
    }
    Yaml::Hash(hash)
  }
}
