// on-chain programs
pub const HELIUM_SUB_DAOS_PROGRAM: &str = "hdaoVTCqhfHHo75XdAMxBKdUqvq1i5bF23sisBqVgGR";
pub const TREASURY_MANAGEMENT_PROGRAM: &str = "treaf4wWBBty3fHdyBpo35Mz84M8k3heKXmjmi9vFt5";
pub const VOTER_STAKE_REGISTRY_PROGRAM: &str = "hvsrNC3NKbcryqDs2DocYHZ9yPKEVzdSjQG6RVtK1s8";
pub const CLOCK_SYSVAR: &str = "SysvarC1ock11111111111111111111111111111111";

// token mints
pub const HNT_MINT: &str = "hntyVP6YFm1Hg25TN9WGLqM12b8TQmcknKrdu1oxWux";
pub const MOBILE_MINT: &str = "mb1eu7TzEc71KxDpsmsKoucSSuuoGLv1drys1oP2jh6";
pub const IOT_MINT: &str = "iotEVVZLEywoTn1QdwNPddxPWszn3zFhEot3MfL9fns";

// sub-DAO accounts
pub const MOBILE_SUB_DAO: &str = "Gm9xDCJawDEKDrrQW6haw94gABaYzQwCq4ZQU8h8bd22";
pub const IOT_SUB_DAO: &str = "39Lw1RH6zt8AJvKn3BTxmUDofzduCM2J3kSaGDZ8L7Sk";

// governance registrars (veHNT, veMOBILE, veIOT)
pub const HNT_REGISTRAR: &str = "BMnWRWZrWqb6JMKznaDqNxWaWAHoaTzVabM6Qwyh3WKz";
pub const MOBILE_REGISTRAR: &str = "C4DWaps9bLiqy4e81wJ7VTQ6QR7C4MWvwsei3ZjsaDuW";
pub const IOT_REGISTRAR: &str = "7ZZopN1mx6ECcb3YCG8dbxeLpA44xq4gzA1ETEiaLoeL";

// decimals
pub const HNT_DECIMALS: u8 = 8;
pub const VEHNT_DECIMALS: u8 = 8;
pub const UTILITY_SCORE_DECIMALS: u8 = 12;

// endpoints
pub const SOLANA_RPC: &str = "https://api.mainnet-beta.solana.com";
pub const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";
pub const DUNE_API: &str = "https://api.dune.com/api/v1";
pub const HNT_COINGECKO_ID: &str = "helium";
