use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use docdeck::{
  cli::{Cli, Commands},
  commands,
};
use docdeck_config::Config;
use log::{LevelFilter, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Init must work even when an existing config file is broken
  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init(output, format, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;

  match &cli.command {
    Commands::Filter {
      page,
      category,
      query,
      list,
      categories,
      output,
    } => {
      let html = read_page(page)?;
      if *categories {
        let result = commands::categories(&html, &config.catalog())?;
        return emit(&result, output.as_deref());
      }
      let result = commands::filter(
        &html,
        &config.catalog(),
        category.as_deref(),
        query.as_deref(),
        *list,
      )
      .wrap_err_with(|| format!("Failed to filter {}", page.display()))?;
      emit(&result, output.as_deref())
    },

    Commands::Toc {
      page,
      fragment,
      output,
    } => {
      let html = read_page(page)?;
      let result = commands::toc(&html, &config.toc(), fragment.as_deref())
        .wrap_err_with(|| {
          format!("Failed to build table of contents for {}", page.display())
        })?;
      emit(&result, output.as_deref())
    },

    Commands::Spy { page, layout } => {
      let html = read_page(page)?;
      let layout_json = fs::read_to_string(layout).wrap_err_with(|| {
        format!("Failed to read layout file: {}", layout.display())
      })?;
      let layout = commands::parse_layout(&layout_json)?;
      let result =
        commands::spy(&html, &config.toc(), &config.spy(), layout)?;
      emit(&result, None)
    },

    Commands::Share {
      url,
      title,
      provider,
    } => {
      let result =
        commands::share(url, title, provider, &config.share_providers())?;
      emit(&result, None)
    },

    Commands::Init { .. } => Ok(()),
  }
}

fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize selectors \
     and behaviour."
  );
  Ok(())
}

fn read_page(path: &Path) -> Result<String> {
  fs::read_to_string(path)
    .wrap_err_with(|| format!("Failed to read page: {}", path.display()))
}

/// Write command output to `output`, or stdout when none is given.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
  if let Some(path) = output {
    fs::write(path, content)
      .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    return Ok(());
  }

  let mut stdout = io::stdout().lock();
  stdout
    .write_all(content.as_bytes())
    .wrap_err("Failed to write to stdout")?;
  stdout.flush().wrap_err("Failed to flush stdout")?;
  Ok(())
}
