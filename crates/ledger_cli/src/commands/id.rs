//! Id command implementation.

use ledger_core::{AssetType, CoreResult, ExternalId};

/// Parses an asset type name such as `deposit` or `auto-expense`.
pub fn parse_asset(name: &str) -> Result<AssetType, String> {
    let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
    AssetType::ALL
        .into_iter()
        .find(|asset| asset_name(*asset) == wanted)
        .ok_or_else(|| format!("unknown asset type '{name}'"))
}

/// Parses a raw id given in decimal or `0x` hex.
pub fn parse_raw(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid id '{text}': {e}"))
}

fn asset_name(asset: AssetType) -> &'static str {
    match asset {
        AssetType::Deposit => "deposit",
        AssetType::Cash => "cash",
        AssetType::AutoExpense => "auto_expense",
        AssetType::Loan => "loan",
        AssetType::Portfolio => "portfolio",
        AssetType::Security => "security",
        AssetType::Payee => "payee",
        AssetType::SecurityHolding => "security_holding",
    }
}

/// Renders the components of an id, one per line.
pub fn describe(id: ExternalId) -> CoreResult<String> {
    let (asset, _, base) = id.decode()?;
    let mut lines = vec![
        format!("id:       {id} ({:#018x})", id.as_u64()),
        format!("asset:    {}", asset_name(asset)),
    ];
    match id.previous_type()? {
        Some(previous) => {
            lines.push(format!("major:    {}", id.original_major()));
            lines.push(format!("previous: {}", asset_name(previous)));
        }
        None => lines.push(format!("major:    {}", id.major())),
    }
    lines.push(format!("base:     {base}"));
    Ok(lines.join("\n"))
}

/// Runs `id encode`.
pub fn encode(asset: AssetType, major: u32, base: u32) -> Result<(), Box<dyn std::error::Error>> {
    let id = ExternalId::with_major(asset, major, base)?;
    println!("{}", describe(id)?);
    Ok(())
}

/// Runs `id decode`.
pub fn decode(raw: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", describe(ExternalId::from_raw(raw))?);
    Ok(())
}

/// Runs `id alternate`.
pub fn alternate(raw: u64, asset: AssetType) -> Result<(), Box<dyn std::error::Error>> {
    let id = ExternalId::from_raw(raw).to_alternate(asset)?;
    println!("{}", describe(id)?);
    Ok(())
}
