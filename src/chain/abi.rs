//! Solidity bindings for the contracts the SDK talks to.

use alloy_sol_types::sol;

sol! {
    /// ERC20 subset used for allowance checks, approvals and metadata.
    #[derive(Debug)]
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

sol! {
    /// HyperFill liquidity vault.
    #[derive(Debug)]
    interface IHyperFillVault {
        function depositLiquidity(uint256 assets) external returns (uint256 shares);
        function withdrawProfits() external returns (uint256 assets);
        function getUserShareBalance(address user) external view returns (uint256);
        function getBalanceUser(address user) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function totalAssets() external view returns (uint256);
        function getSharePrice() external view returns (uint256);
        function getAvailableAssets() external view returns (uint256);
        function minDeposit() external view returns (uint256);
        function paused() external view returns (bool);
        function previewDeposit(uint256 assets) external view returns (uint256);
        function previewRedeem(uint256 shares) external view returns (uint256);

        event LiquidityAdded(address indexed user, uint256 assets, uint256 shares);
        event LiquidityRemoved(address indexed user, uint256 assets, uint256 shares);
    }
}
