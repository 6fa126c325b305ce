//! Listing command handlers.

use tabled::Tabled;

use estatelist_core::{
    Listing, ListingDraft, ListingFilter, ListingGateway, PAGE_SIZE, Portal,
};

use crate::cli::{GlobalOpts, ListFilterArgs, ListingEditArgs, ListingFieldArgs, ListingsArgs, ListingsCommand};
use crate::error::CliError;
use crate::output::{self, format_price};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Bd")]
    bedrooms: u32,
    #[tabled(rename = "Ba")]
    bathrooms: u32,
    #[tabled(rename = "Sqft")]
    area: u32,
}

impl From<&Listing> for ListingRow {
    fn from(l: &Listing) -> Self {
        Self {
            id: l.id.to_string(),
            title: l.title.clone(),
            property_type: l.property_type.label().into(),
            price: format_price(l.price),
            location: l.location.clone(),
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            area: l.area_sqft,
        }
    }
}

fn detail(l: &Listing) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", l.title));
    out.push_str(&format!("  {}\n", l.location));
    out.push_str(&format!(
        "  {} -- {} bd, {} ba, {} sqft ({})\n",
        format_price(l.price),
        l.bedrooms,
        l.bathrooms,
        l.area_sqft,
        l.property_type.label()
    ));
    out.push_str(&format!("  Listed: {}\n", l.created_at.format("%Y-%m-%d")));
    if let Some(ref url) = l.image_url {
        out.push_str(&format!("  Image: {url}\n"));
    }
    out.push_str(&format!("\n{}\n", l.description));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    portal: &Portal,
    args: ListingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ListingsCommand::List(filter_args) => list(portal, filter_args, global).await,

        ListingsCommand::Get { id } => {
            let id = util::parse_listing_id(&id)?;
            let listing = portal.listing(id).await?;
            let out = output::render_single(&global.output, &listing, detail, |l| l.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ListingsCommand::Create(fields) => create(portal, fields, global).await,

        ListingsCommand::Edit { id, fields } => edit(portal, &id, fields, global).await,

        ListingsCommand::Delete { id } => {
            let id = util::parse_listing_id(&id)?;
            let listing = portal.listing(id).await?;
            if !util::confirm(
                &format!("Delete '{}'? This cannot be undone.", listing.title),
                global.yes,
            )? {
                return Ok(());
            }
            portal.delete_listing(&listing).await?;
            if !global.quiet {
                eprintln!("Listing deleted");
            }
            Ok(())
        }

        ListingsCommand::Mine => {
            let listings = portal.my_listings().await?;
            let out = output::render_list(
                &global.output,
                &listings,
                |l| ListingRow::from(l),
                |l| l.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn list(
    portal: &Portal,
    args: ListFilterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = ListingFilter {
        property_type: args.property_type.map(Into::into),
        min_price: args.min_price,
        max_price: args.max_price,
        location: args.location,
    };

    let all = portal.gateway().list(&filter).await?;
    let page_count = all.len().div_ceil(PAGE_SIZE);
    let page = args.page.clamp(1, page_count.max(1));
    let page_rows: Vec<Listing> = all
        .chunks(PAGE_SIZE)
        .nth(page - 1)
        .map(<[Listing]>::to_vec)
        .unwrap_or_default();

    let out = output::render_list(
        &global.output,
        &page_rows,
        |l| ListingRow::from(l),
        |l| l.id.to_string(),
    );
    output::print_output(&out, global.quiet);

    if !global.quiet && page_count > 1 {
        eprintln!("Page {page} of {page_count} ({} listings)", all.len());
    }
    Ok(())
}

async fn create(
    portal: &Portal,
    fields: ListingFieldArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let draft = ListingDraft {
        title: fields.title,
        description: fields.description,
        property_type: fields.property_type.into(),
        price: fields.price,
        location: fields.location,
        bedrooms: fields.bedrooms,
        bathrooms: fields.bathrooms,
        area_sqft: fields.area,
    };
    validate_draft(&draft)?;

    let image = fields.image.as_deref().map(util::read_image).transpose()?;
    let listing = portal.create_listing(&draft, image).await?;

    if !global.quiet {
        eprintln!("Listing created: {}", listing.id);
    }
    Ok(())
}

async fn edit(
    portal: &Portal,
    id: &str,
    fields: ListingEditArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::parse_listing_id(id)?;
    let current = portal.listing(id).await?;

    // Absent flags keep the stored values; the patch always carries
    // the full field set.
    let patch = ListingDraft {
        title: fields.title.unwrap_or_else(|| current.title.clone()),
        description: fields
            .description
            .unwrap_or_else(|| current.description.clone()),
        property_type: fields
            .property_type
            .map_or(current.property_type, Into::into),
        price: fields.price.unwrap_or(current.price),
        location: fields.location.unwrap_or_else(|| current.location.clone()),
        bedrooms: fields.bedrooms.unwrap_or(current.bedrooms),
        bathrooms: fields.bathrooms.unwrap_or(current.bathrooms),
        area_sqft: fields.area.unwrap_or(current.area_sqft),
    };
    validate_draft(&patch)?;

    let image = fields.image.as_deref().map(util::read_image).transpose()?;
    let updated = portal.update_listing(&current, &patch, image).await?;

    if !global.quiet {
        eprintln!("Listing updated: {}", updated.id);
    }
    Ok(())
}

fn validate_draft(draft: &ListingDraft) -> Result<(), CliError> {
    if draft.title.trim().is_empty() {
        return Err(CliError::Validation {
            field: "title".into(),
            reason: "must not be empty".into(),
        });
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(CliError::Validation {
            field: "price".into(),
            reason: "must be non-negative".into(),
        });
    }
    Ok(())
}
