//! Proc-macros for the docdeck configuration system.
//!
//! `#[derive(Configurable)]` generates two methods on a config struct:
//!
//! - `apply_override(&mut self, key, value)`, which parses a `KEY=VALUE`
//!   override into the matching field (dotted keys descend into nested
//!   configs), and
//! - `merge_fields(&mut self, other)`, which folds a later config into an
//!   earlier one.

use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{
  Attribute,
  Data,
  DeriveInput,
  Fields,
  GenericArgument,
  PathArguments,
  Type,
  parse_macro_input,
};

/// Attribute configuration for a field.
#[derive(Default)]
struct FieldConfig {
  /// The config key name (defaults to field name).
  key: Option<String>,

  /// Field holds an `Option<T>` where `T` is itself `Configurable`.
  nested: bool,

  /// Empty override values reset an `Option` field to `None`.
  allow_empty: bool,

  /// Field is runtime-only and never overridden.
  skip: bool,
}

impl FieldConfig {
  fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
    let mut config = Self::default();

    for attr in attrs {
      if !attr.path().is_ident("config") {
        continue;
      }

      attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
          let lit: syn::LitStr = meta.value()?.parse()?;
          config.key = Some(lit.value());
        } else if meta.path.is_ident("nested") {
          config.nested = true;
        } else if meta.path.is_ident("allow_empty") {
          config.allow_empty = true;
        } else if meta.path.is_ident("skip") {
          config.skip = true;
        } else {
          return Err(meta.error("unknown config attribute"));
        }
        Ok(())
      })?;
    }

    Ok(config)
  }
}

/// How a field's type is parsed from an override string and merged.
enum FieldKind {
  Text,
  Flag,
  List,
  Optional(Box<FieldKind>),
  Parsed(String),
}

impl FieldKind {
  fn of(ty: &Type) -> Self {
    let Some((ident, inner)) = outer_ident(ty) else {
      return Self::Parsed(ty.to_token_stream().to_string());
    };

    match (ident.as_str(), inner) {
      ("String", _) => Self::Text,
      ("bool", _) => Self::Flag,
      ("Vec", Some(_)) => Self::List,
      ("Option", Some(inner)) => Self::Optional(Box::new(Self::of(inner))),
      _ => Self::Parsed(ident),
    }
  }
}

/// Last path segment of a type and its first generic argument, if any.
fn outer_ident(ty: &Type) -> Option<(String, Option<&Type>)> {
  let Type::Path(path) = ty else {
    return None;
  };
  let segment = path.path.segments.last()?;
  let inner = match &segment.arguments {
    PathArguments::AngleBracketed(args) => {
      args.args.iter().find_map(|arg| {
        match arg {
          GenericArgument::Type(ty) => Some(ty),
          _ => None,
        }
      })
    },
    _ => None,
  };
  Some((segment.ident.to_string(), inner))
}

/// Derive macro for configuration structs.
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);
  expand(&input)
    .unwrap_or_else(syn::Error::into_compile_error)
    .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
  let name = &input.ident;
  let (impl_generics, ty_generics, where_clause) =
    input.generics.split_for_impl();

  let fields = match &input.data {
    Data::Struct(data) => &data.fields,
    _ => {
      return Err(syn::Error::new_spanned(
        input,
        "Configurable can only be derived for structs",
      ));
    },
  };

  let Fields::Named(_) = fields else {
    return Err(syn::Error::new_spanned(
      input,
      "Configurable requires named fields",
    ));
  };

  let mut override_handlers = Vec::new();
  let mut merge_handlers = Vec::new();

  for field in fields {
    let config = FieldConfig::from_attrs(&field.attrs)?;
    let Some(field_name) = field.ident.as_ref() else {
      continue;
    };
    let kind = FieldKind::of(&field.ty);

    merge_handlers.push(merge_handler(field_name, &kind));

    if config.skip {
      continue;
    }
    let key = config.key.clone().unwrap_or_else(|| field_name.to_string());
    override_handlers.push(if config.nested {
      nested_handler(field_name, &key)
    } else {
      field_handler(field_name, &key, &kind, &config)
    });
  }

  Ok(quote! {
    impl #impl_generics #name #ty_generics #where_clause {
      /// Apply a configuration override by key.
      ///
      /// # Errors
      ///
      /// Returns an error if the key is unknown or the value cannot be parsed
      /// into the field's type.
      pub fn apply_override(
        &mut self,
        key: &str,
        value: &str,
      ) -> ::std::result::Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        #(#override_handlers)*

        Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for supported keys.",
        )))
      }

      /// Merge another config into this one, the other config taking
      /// precedence.
      pub fn merge_fields(&mut self, other: Self) {
        #(#merge_handlers)*
      }
    }
  })
}

fn nested_handler(
  field_name: &syn::Ident,
  key: &str,
) -> proc_macro2::TokenStream {
  let prefix = format!("{key}.");
  quote! {
    if let Some(subkey) = key.strip_prefix(#prefix) {
      return self
        .#field_name
        .get_or_insert_with(Default::default)
        .apply_override(subkey, value);
    }
  }
}

fn field_handler(
  field_name: &syn::Ident,
  key: &str,
  kind: &FieldKind,
  config: &FieldConfig,
) -> proc_macro2::TokenStream {
  let parse = parse_expr(field_name, kind);
  let assignment = match kind {
    FieldKind::Optional(inner) => {
      let parse_inner = parse_expr(field_name, inner);
      if config.allow_empty {
        quote! {
          self.#field_name = if value.is_empty() {
            None
          } else {
            Some(#parse_inner)
          };
        }
      } else {
        quote! { self.#field_name = Some(#parse_inner); }
      }
    },
    _ => quote! { self.#field_name = #parse; },
  };

  quote! {
    if key == #key {
      #assignment
      return Ok(());
    }
  }
}

/// Expression turning `value: &str` into the field's type, returning early
/// with a `ConfigError` on failure.
fn parse_expr(
  field_name: &syn::Ident,
  kind: &FieldKind,
) -> proc_macro2::TokenStream {
  match kind {
    FieldKind::Text => quote! { value.to_string() },
    FieldKind::Flag => {
      quote! {
        match value.to_lowercase().as_str() {
          "true" | "yes" | "1" => true,
          "false" | "no" | "0" => false,
          _ => {
            return Err(ConfigError::Config(format!(
              "Invalid boolean value for '{}': '{}'. Expected true/false, yes/no, or 1/0",
              stringify!(#field_name), value
            )));
          }
        }
      }
    },
    FieldKind::List => {
      quote! {
        value
          .split(',')
          .map(str::trim)
          .filter(|item| !item.is_empty())
          .map(|item| item.parse())
          .collect::<::std::result::Result<Vec<_>, _>>()
          .map_err(|_| ConfigError::Config(format!(
            "Invalid value for '{}': '{}'. Expected a comma-separated list",
            stringify!(#field_name), value
          )))?
      }
    },
    FieldKind::Optional(inner) => parse_expr(field_name, inner),
    FieldKind::Parsed(type_name) => {
      let expected = match type_name.as_str() {
        "f32" | "f64" => "Expected a number",
        "u8" | "u16" | "u32" | "u64" | "usize" => {
          "Expected a non-negative integer"
        },
        _ => "Expected a valid value",
      };
      quote! {
        value.parse().map_err(|_| ConfigError::Config(format!(
          "Invalid value for '{}': '{}'. {}",
          stringify!(#field_name), value, #expected
        )))?
      }
    },
  }
}

fn merge_handler(
  field_name: &syn::Ident,
  kind: &FieldKind,
) -> proc_macro2::TokenStream {
  match kind {
    FieldKind::Optional(_) => {
      quote! {
        if other.#field_name.is_some() {
          self.#field_name = other.#field_name;
        }
      }
    },
    FieldKind::List => {
      quote! {
        for item in other.#field_name {
          if !self.#field_name.contains(&item) {
            self.#field_name.push(item);
          }
        }
      }
    },
    _ => quote! { self.#field_name = other.#field_name; },
  }
}
