// The GTK4 window is only built with `--features gui`; without it the
// binary still works through its subcommands.

#[cfg(not(feature = "gui"))]
pub fn run(_config: &'static crate::config::Config) -> anyhow::Result<()> {
    anyhow::bail!(
        "this build has no window. \
         Rebuild with --features gui, or use `bibimamba create --root <dir>`"
    )
}

#[cfg(feature = "gui")]
pub use window::run;

#[cfg(feature = "gui")]
mod window {
    use gtk4 as gtk;
    use gtk4::{gio, glib};
    use libadwaita as adw;

    use adw::prelude::*;
    use gtk::prelude::*;
    use std::{cell::RefCell, path::Path, rc::Rc};

    use crate::config::Config;
    use crate::controller::Session;
    use crate::creator::{self, EnvironmentCreator, Outcome};
    use crate::error::CreateError;
    use crate::worker::{self, Completion};

    const APP_ID: &str = "io.github.bibimamba";

    pub fn run(config: &'static Config) -> anyhow::Result<()> {
        let app = adw::Application::builder().application_id(APP_ID).build();
        app.connect_activate(move |app| build_ui(app, config));
        // our own flags were already parsed by clap
        let _ = app.run_with_args::<&str>(&[]);
        Ok(())
    }

    fn build_ui(app: &adw::Application, config: &'static Config) {
        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title("bibimamba")
            .default_width(560)
            .resizable(false)
            .build();

        let content = gtk::Box::new(gtk::Orientation::Vertical, 0);
        content.append(&adw::HeaderBar::new());

        let body = gtk::Box::new(gtk::Orientation::Vertical, 12);
        body.set_margin_top(18);
        body.set_margin_bottom(18);
        body.set_margin_start(18);
        body.set_margin_end(18);

        let root_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let root_entry = gtk::Entry::builder()
            .hexpand(true)
            .placeholder_text("Installation root")
            .build();
        let browse_btn = gtk::Button::with_label("Browse…");
        root_row.append(&root_entry);
        root_row.append(&browse_btn);

        let version_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let versions: Vec<&str> = config.python_versions.iter().map(String::as_str).collect();
        let version_drop = gtk::DropDown::from_strings(&versions);
        version_drop.set_hexpand(true);
        let create_btn = gtk::Button::with_label("Create");
        create_btn.add_css_class("suggested-action");
        version_row.append(&gtk::Label::new(Some("Python")));
        version_row.append(&version_drop);
        version_row.append(&create_btn);

        let status_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let spinner = gtk::Spinner::new();
        let status = gtk::Label::new(None);
        status.set_use_markup(true);
        status.set_wrap(true);
        status.set_xalign(0.0);
        status_row.append(&spinner);
        status_row.append(&status);

        body.append(&root_row);
        body.append(&version_row);
        body.append(&status_row);
        content.append(&body);
        window.set_content(Some(&content));

        {
            let window = window.clone();
            let root_entry = root_entry.clone();
            browse_btn.connect_clicked(move |_| choose_root(&window, &root_entry));
        }

        let session = Rc::new(RefCell::new(Session::new()));
        {
            let window = window.clone();
            create_btn.connect_clicked(move |btn| {
                let root = root_entry.text();
                let version = config
                    .python_versions
                    .get(version_drop.selected() as usize)
                    .map(String::as_str)
                    .unwrap_or("");

                let spec = match session
                    .borrow_mut()
                    .begin(root.as_str(), version, &config.fallback_version)
                {
                    Ok(spec) => spec,
                    Err(err) => {
                        tracing::warn!(%err, "request rejected");
                        show_message(
                            &window,
                            gtk::MessageType::Warning,
                            &err.title(),
                            &err.to_string(),
                        );
                        return;
                    }
                };

                let source = match config.executable_source(None) {
                    Ok(source) => source,
                    Err(err) => {
                        session.borrow_mut().abort();
                        show_message(
                            &window,
                            gtk::MessageType::Error,
                            "No micromamba",
                            &err.to_string(),
                        );
                        return;
                    }
                };
                let creator = EnvironmentCreator::new(source, config.channel.clone());

                status.set_text(" Waiting ... ");
                btn.set_sensitive(false);
                spinner.start();

                let (tx, rx) = glib::MainContext::channel::<Completion>(glib::PRIORITY_DEFAULT);
                {
                    let window = window.clone();
                    let session = session.clone();
                    let btn = btn.clone();
                    let spinner = spinner.clone();
                    let status = status.clone();
                    rx.attach(None, move |done| {
                        let (spec, result) = session.borrow_mut().finish(done);
                        spinner.stop();
                        btn.set_sensitive(true);
                        match result {
                            Ok(outcome) => match creator::resulting_interpreter(&spec, &outcome) {
                                Some(python) => status.set_markup(&link_markup(&python)),
                                None => {
                                    if let Outcome::NoExecutable { location } = outcome {
                                        let text = format!("No micromamba under [{location}]");
                                        status.set_text(&text);
                                    }
                                }
                            },
                            Err(CreateError::ProcessFailed { code, stderr, .. }) => {
                                eprintln!("micromamba exited with code {code}");
                                eprint!("{stderr}");
                                std::process::exit(code);
                            }
                            Err(err) => {
                                tracing::error!(%err, "environment creation failed");
                                status.set_text("");
                                show_message(
                                    &window,
                                    gtk::MessageType::Error,
                                    "Creation failed",
                                    &err.to_string(),
                                );
                            }
                        }
                        glib::Continue(false)
                    });
                }

                if let Err(err) = worker::spawn(creator, spec, move |done| {
                    let _ = tx.send(done);
                }) {
                    tracing::error!(%err, "could not start worker");
                    session.borrow_mut().abort();
                    spinner.stop();
                    btn.set_sensitive(true);
                    status.set_text("");
                    show_message(
                        &window,
                        gtk::MessageType::Error,
                        "Creation failed",
                        &err.to_string(),
                    );
                }
            });
        }

        window.present();
    }

    fn choose_root(window: &adw::ApplicationWindow, root_entry: &gtk::Entry) {
        let dialog = gtk::FileChooserDialog::new(
            Some("Open Directory"),
            Some(window),
            gtk::FileChooserAction::SelectFolder,
            &[
                ("Cancel", gtk::ResponseType::Cancel),
                ("Select", gtk::ResponseType::Accept),
            ],
        );
        dialog.set_modal(true);
        if let Ok(cwd) = std::env::current_dir() {
            let _ = dialog.set_current_folder(Some(&gio::File::for_path(cwd)));
        }

        let root_entry = root_entry.clone();
        dialog.connect_response(move |d, response| {
            if response == gtk::ResponseType::Accept {
                if let Some(path) = d.file().and_then(|f| f.path()) {
                    if path.exists() {
                        let path = path.canonicalize().unwrap_or(path);
                        root_entry.set_text(&path.to_string_lossy());
                    }
                }
            }
            d.close();
        });
        dialog.show();
    }

    /// Label markup linking the interpreter's directory.
    fn link_markup(python: &Path) -> String {
        let text = glib::markup_escape_text(&python.to_string_lossy());
        let dir = python.parent().unwrap_or(python);
        match glib::filename_to_uri(dir, None) {
            Ok(uri) => format!("<a href=\"{}\">{}</a>", glib::markup_escape_text(&uri), text),
            Err(_) => text.to_string(),
        }
    }

    fn show_message(
        window: &adw::ApplicationWindow,
        kind: gtk::MessageType,
        title: &str,
        body: &str,
    ) {
        let dialog = gtk::MessageDialog::builder()
            .transient_for(window)
            .modal(true)
            .message_type(kind)
            .buttons(gtk::ButtonsType::Ok)
            .text(title)
            .secondary_text(body)
            .build();
        dialog.connect_response(|dlg, _| dlg.close());
        dialog.show();
    }
}
