use std::path::PathBuf;

use gpui::*;
use gpui_component::Root;

use crate::mtree_story::{MTreeStory, load_document};

mod logging;
mod mtree_story;

fn main() -> anyhow::Result<()> {
    logging::init();

    let document = load_document(std::env::args_os().nth(1).map(PathBuf::from))?;
    tracing::info!(
        groups = document.groups.len(),
        nodes = document.nodes.len(),
        "loaded tree document"
    );

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("MTree".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = MTreeStory::view(document, window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
