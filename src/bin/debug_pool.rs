use anyhow::{Context, Result};
use clap::Parser;

use poolscope::codec::{AccountReader, ADDRESS_LEN};
use poolscope::infrastructure::blockchain::{AccountSource, RpcAccountFetcher, DEFAULT_TIMEOUT_MS};
use poolscope::shared::utils::validate_pool_address;
use poolscope::{PoolConfigRecord, PoolStateRecord};

/// Dump an account's raw layout next to both decoders' output
#[derive(Parser, Debug)]
struct Args {
    /// Account to inspect
    address: String,

    /// RPC endpoint URL
    #[arg(long, default_value = "https://api.mainnet-beta.solana.com")]
    rpc_url: String,

    /// Number of 32-byte rows to print (all rows when omitted)
    #[arg(long)]
    rows: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    validate_pool_address(&args.address)?;

    let fetcher = RpcAccountFetcher::new(args.rpc_url.clone(), DEFAULT_TIMEOUT_MS)?;
    let account = fetcher
        .fetch_account(&args.address)
        .await
        .with_context(|| format!("fetch {}", args.address))?;
    let data = account.decode_data()?;

    println!("🔍 Account: {}", account.address);
    println!("📊 Owner: {}", account.owner);
    println!("📊 Data size: {} bytes", data.len());

    let reader = AccountReader::new(&data);
    if reader.is_empty() {
        println!("❌ Account holds no data");
        return Ok(());
    }
    let rows = args.rows.unwrap_or(usize::MAX);

    println!("\n🔍 Layout:");
    for (i, chunk) in data.chunks(ADDRESS_LEN).enumerate().take(rows) {
        let offset = i * ADDRESS_LEN;
        println!("  {:4}: {}", offset, hex::encode(chunk));

        if chunk.len() == ADDRESS_LEN && chunk.iter().any(|b| *b != 0) {
            println!("        -> address: {}", reader.read_address(offset)?);
        }
        if let Ok(value) = reader.read_u64_le(offset) {
            if value > 0 && value < 1_000_000_000_000_000_000 {
                println!("        -> u64: {}", value);
            }
        }
    }

    println!("\n🔍 As pool state:");
    match PoolStateRecord::try_decode(&data) {
        Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        Err(e) => println!("  ❌ {}", e),
    }

    println!("\n🔍 As pool config:");
    match PoolConfigRecord::try_decode(&data) {
        Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        Err(e) => println!("  ❌ {}", e),
    }

    Ok(())
}
