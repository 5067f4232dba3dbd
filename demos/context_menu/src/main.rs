use std::time::{Duration, Instant};

use slick_menu::prelude::*;

const MENU: &str = r#"
Copy = "copy"
Paste = "paste"

[Share]
Mail = "mail"

[Share.Social]
Mastodon = "mastodon"

[Export]
PDF = "pdf"
"#;

fn print_requests(menu: &mut ContextMenu) {
    for request in menu.drain_requests() {
        match request {
            SurfaceRequest::Place { menu, position } => {
                println!("  place  {:?} at ({:.0}, {:.0})", menu, position.x, position.y)
            },
            SurfaceRequest::Remove { menu } => println!("  remove {:?}", menu),
            SurfaceRequest::Focus { menu } => println!("  focus  {:?}", menu),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Context Menu Demo");
    println!("=================");
    println!("Set SLICK_MENU_CONFIG to a TOML file to change delays and metrics.");
    println!("Set RUST_LOG=debug to see placement decisions.");
    println!();

    let config = MenuConfig::from_env_or_default();
    println!(
        "Delays: open {}ms, close {}ms",
        config.delays.open_ms, config.delays.close_ms
    );

    let registry = ActionRegistry::new()
        .with("copy", || {
            println!("  -> copied");
            Ok(())
        })
        .with("paste", || {
            println!("  -> pasted");
            Ok(())
        })
        .with("mail", || {
            println!("  -> mail composer opened");
            Ok(())
        })
        .with("mastodon", || {
            println!("  -> tooted");
            Ok(())
        })
        .with("pdf", || anyhow::bail!("no printer configured"));

    let spec = MenuSpec::from_toml(MENU)?;
    let mut menu = create_menu_with(&spec, &registry, config)?;
    let share = menu.find(&["Share"]).ok_or_else(|| anyhow::anyhow!("missing Share menu"))?;
    let social = menu
        .find(&["Share", "Social"])
        .ok_or_else(|| anyhow::anyhow!("missing Social menu"))?;
    let root = menu.root();

    // 1520x780 window at (200, 200) on a 1920x1080 screen.
    let mut env = FixedEnvironment::new(WindowBounds::new(200.0, 200.0, 1520.0, 780.0));
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    println!();
    println!("Right click near the bottom-right corner:");
    let placement = menu.open_at(&env, 1950, 900);
    for warning in &placement.warnings {
        println!("  warning: {:?}", warning);
    }
    print_requests(&mut menu);

    println!();
    println!("Hover 'Share' for 250ms:");
    let share_anchor = HoverTarget::row(root, 2);
    env.set_pointer(Some(share_anchor));
    menu.pointer_enter(share_anchor, at(0));
    menu.update(&env, at(250));
    println!("  Share is {:?}", menu.hover_state(share));
    print_requests(&mut menu);

    println!();
    println!("Move into the submenu and on to 'Social':");
    menu.pointer_leave(share_anchor, at(300));
    let social_anchor = HoverTarget::row(share, 1);
    env.set_pointer(Some(social_anchor));
    menu.pointer_enter(social_anchor, at(320));
    while let Some(deadline) = menu.next_deadline() {
        for outcome in menu.update(&env, deadline) {
            println!("  {:?}", outcome);
        }
    }
    println!("  Share is {:?}, Social is {:?}", menu.hover_state(share), menu.hover_state(social));
    print_requests(&mut menu);

    println!();
    println!("Click 'Mastodon':");
    let mastodon = HoverTarget::row(social, 0);
    env.set_pointer(Some(mastodon));
    menu.primary_click(&env, Some(mastodon))?;
    println!("  menu open: {}", menu.is_open());
    print_requests(&mut menu);

    println!();
    println!("Open again and click 'Export > PDF':");
    menu.open_at(&env, 400, 300);
    let export = HoverTarget::row(root, 3);
    menu.primary_click(&env, Some(export))?;
    let pdf = menu.find(&["Export"]).map(|export| HoverTarget::row(export, 0));
    if let Err(err) = menu.primary_click(&env, pdf) {
        log::error!("{:#}", anyhow::Error::from(err));
        println!("  action failed, menu open: {}", menu.is_open());
    }
    print_requests(&mut menu);

    Ok(())
}
