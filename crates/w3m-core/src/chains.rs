//! EVM chain presets whose artwork is prefetched

/// Chain preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainPreset {
    /// CAIP-2 chain id
    pub chain_id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Asset image id on the directory
    pub image_id: &'static str,
}

/// Supported EVM chains
pub const ETH_CHAINS: &[ChainPreset] = &[
    ChainPreset {
        chain_id: "eip155:1",
        name: "Ethereum",
        image_id: "692ed6ba-e569-459a-556a-776476829e00",
    },
    ChainPreset {
        chain_id: "eip155:42161",
        name: "Arbitrum",
        image_id: "600a9a04-c1b9-42ca-6785-9b4b6ff85200",
    },
    ChainPreset {
        chain_id: "eip155:137",
        name: "Polygon",
        image_id: "41d04d42-da3b-4453-8506-668cc0727900",
    },
    ChainPreset {
        chain_id: "eip155:43114",
        name: "Avalanche",
        image_id: "30c46e53-e989-45fb-4549-be3bd4eb3b00",
    },
    ChainPreset {
        chain_id: "eip155:56",
        name: "BNB Smart Chain",
        image_id: "93564157-2e8e-4ce7-81df-b264dbee9b00",
    },
    ChainPreset {
        chain_id: "eip155:10",
        name: "Optimism",
        image_id: "ab9c186a-c52f-464b-2906-ca59d760a400",
    },
    ChainPreset {
        chain_id: "eip155:100",
        name: "Gnosis",
        image_id: "02b53f6a-e3d4-479e-1cb4-21178987d100",
    },
    ChainPreset {
        chain_id: "eip155:324",
        name: "zkSync",
        image_id: "b310f07f-4ef7-49f3-7073-2a0a39685800",
    },
    ChainPreset {
        chain_id: "eip155:42220",
        name: "Celo",
        image_id: "ab781bbc-ccc6-418d-d32d-789b15da1f00",
    },
    ChainPreset {
        chain_id: "eip155:1313161554",
        name: "Aurora",
        image_id: "3ff73439-a619-4894-9262-4470c773a100",
    },
    ChainPreset {
        chain_id: "eip155:8453",
        name: "Base",
        image_id: "7289c336-3981-4081-c5f4-efc26ac64a00",
    },
    ChainPreset {
        chain_id: "eip155:7777777",
        name: "Zora",
        image_id: "845c60df-d429-4991-e687-91ae45791600",
    },
];

/// Look up a preset by CAIP-2 id
pub fn find_chain(chain_id: &str) -> Option<&'static ChainPreset> {
    ETH_CHAINS.iter().find(|chain| chain.chain_id == chain_id)
}
