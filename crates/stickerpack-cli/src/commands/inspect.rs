use super::{format_size, json_pretty, Failure, EXIT_SUCCESS};
use stickerpack_core::{Loader, PackSource};

pub fn run(
    loader: &Loader,
    identifier: &str,
    source: &PackSource,
    json: bool,
) -> Result<u8, Failure> {
    let packs = loader.load(source)?;
    let pack = packs
        .iter()
        .find(|p| p.identifier == identifier)
        .ok_or_else(|| format!("no pack with identifier '{identifier}'"))?;

    if json {
        println!("{}", json_pretty(pack)?);
        return Ok(EXIT_SUCCESS);
    }

    let none = "(none)";
    println!("identifier:        {}", pack.identifier);
    println!("name:              {}", pack.name);
    println!("publisher:         {}", pack.publisher);
    println!("tray image:        {}", pack.tray_image_file);
    println!("image version:     {}", pack.image_data_version);
    println!("avoid cache:       {}", pack.avoid_cache);
    println!(
        "publisher email:   {}",
        pack.publisher_email.as_deref().unwrap_or(none)
    );
    println!(
        "publisher website: {}",
        pack.publisher_website.as_deref().unwrap_or(none)
    );
    println!(
        "privacy policy:    {}",
        pack.privacy_policy_website.as_deref().unwrap_or(none)
    );
    println!(
        "license:           {}",
        pack.license_agreement_website.as_deref().unwrap_or(none)
    );
    println!(
        "android link:      {}",
        pack.android_play_store_link.as_deref().unwrap_or(none)
    );
    println!(
        "ios link:          {}",
        pack.ios_app_store_link.as_deref().unwrap_or(none)
    );
    println!("total size:        {}", format_size(pack.total_size()));
    println!("stickers:          {}", pack.items.len());
    for item in &pack.items {
        println!(
            "  {:<24} {:>10}  {}",
            item.file_name.as_str(),
            format_size(item.size_bytes),
            item.tags.join(" ")
        );
    }
    Ok(EXIT_SUCCESS)
}
