use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::api::OrderSide;
use crate::trading::{ExchangeSession, OperationOutcome, OrderGateway};

/// A fully parsed user action. Building this up-front keeps parsing and
/// dispatch separate, so neither needs a live console to test.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MarketOrder {
        symbol: String,
        side: OrderSide,
        quantity: f64,
    },
    LimitOrder {
        symbol: String,
        side: OrderSide,
        quantity: f64,
        price: f64,
    },
    OrderStatus {
        symbol: String,
        order_id: i64,
    },
    Exit,
}

/// Blocking menu loop over any line-oriented input and output. Each
/// iteration is atomic: read a choice, act on it, print, repeat. Only the
/// literal choice `4` (or end of input) leaves the loop.
pub struct InteractiveShell<S: ExchangeSession, R: BufRead, W: Write> {
    gateway: OrderGateway<S>,
    input: R,
    output: W,
}

impl<S: ExchangeSession, R: BufRead, W: Write> InteractiveShell<S, R, W> {
    pub fn new(gateway: OrderGateway<S>, input: R, output: W) -> Self {
        Self {
            gateway,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\nWelcome to Binance Futures Bot")?;

        loop {
            writeln!(
                self.output,
                "\nOptions:\n1: Market Order\n2: Limit Order\n3: Order Status\n4: Exit"
            )?;
            let Some(choice) = self.prompt("Select option: ")? else {
                return Ok(()); // stdin closed
            };

            match self.read_command(choice.trim()) {
                Ok(Some(Command::Exit)) => {
                    writeln!(self.output, "Exiting.")?;
                    return Ok(());
                }
                Ok(Some(command)) => {
                    if let Err(err) = self.dispatch(command).await {
                        self.report_error(err)?;
                    }
                }
                Ok(None) => {
                    writeln!(self.output, "Invalid choice. Please select 1-4.")?;
                }
                Err(err) => self.report_error(err)?,
            }
        }
    }

    /// Collects the remaining fields for a menu choice. `None` means the
    /// choice itself was not recognized; parse failures bubble up to the
    /// loop boundary like any other unexpected error.
    fn read_command(&mut self, choice: &str) -> Result<Option<Command>> {
        let command = match choice {
            "1" => {
                let symbol = self.prompt_required("Symbol (e.g., BTCUSDT): ")?;
                let side = self.prompt_side()?;
                let quantity = self.prompt_parsed::<f64>("Quantity: ")?;
                Command::MarketOrder {
                    symbol,
                    side,
                    quantity,
                }
            }
            "2" => {
                let symbol = self.prompt_required("Symbol (e.g., BTCUSDT): ")?;
                let side = self.prompt_side()?;
                let quantity = self.prompt_parsed::<f64>("Quantity: ")?;
                let price = self.prompt_parsed::<f64>("Price: ")?;
                Command::LimitOrder {
                    symbol,
                    side,
                    quantity,
                    price,
                }
            }
            "3" => {
                let symbol = self.prompt_required("Symbol (e.g., BTCUSDT): ")?;
                let order_id = self.prompt_parsed::<i64>("Order ID: ")?;
                Command::OrderStatus { symbol, order_id }
            }
            "4" => Command::Exit,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::MarketOrder {
                symbol,
                side,
                quantity,
            } => {
                let outcome = self
                    .gateway
                    .place_market_order(&symbol, side, quantity)
                    .await?;
                self.print_outcome("Market Order Result", "Failed to place market order", outcome)
            }
            Command::LimitOrder {
                symbol,
                side,
                quantity,
                price,
            } => {
                let outcome = self
                    .gateway
                    .place_limit_order(&symbol, side, quantity, price)
                    .await?;
                self.print_outcome("Limit Order Result", "Failed to place limit order", outcome)
            }
            Command::OrderStatus { symbol, order_id } => {
                let outcome = self.gateway.get_order_status(&symbol, order_id).await?;
                self.print_outcome("Order Status", "Failed to fetch order status", outcome)
            }
            Command::Exit => Ok(()), // intercepted by the loop
        }
    }

    fn print_outcome(
        &mut self,
        success_label: &str,
        failure_label: &str,
        outcome: OperationOutcome,
    ) -> Result<()> {
        match outcome {
            OperationOutcome::Success(order) => {
                writeln!(self.output, "{}: {}", success_label, order)?;
            }
            OperationOutcome::Failure(rejection) => {
                writeln!(self.output, "{}: {}", failure_label, rejection.message)?;
            }
        }
        Ok(())
    }

    fn report_error(&mut self, err: anyhow::Error) -> Result<()> {
        tracing::error!("Unexpected error in CLI loop: {:#}", err);
        writeln!(self.output, "An error occurred: {:#}", err)?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn prompt_required(&mut self, label: &str) -> Result<String> {
        self.prompt(label)?
            .map(|line| line.trim().to_string())
            .ok_or_else(|| anyhow!("Input closed mid-command"))
    }

    fn prompt_side(&mut self) -> Result<OrderSide> {
        self.prompt_required("Side (BUY/SELL): ")?.to_uppercase().parse()
    }

    fn prompt_parsed<T>(&mut self, label: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.prompt_required(label)?;
        raw.parse()
            .with_context(|| format!("Invalid number: {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, OrderResult, OrderType, TimeInForce};
    use crate::trading::gateway::MockExchangeSession;
    use std::io::Cursor;

    fn sample_order(symbol: &str, order_type: &str) -> OrderResult {
        OrderResult {
            order_id: 283194212,
            symbol: symbol.to_string(),
            status: "NEW".to_string(),
            client_order_id: String::new(),
            side: "BUY".to_string(),
            order_type: order_type.to_string(),
            orig_qty: "0.01".to_string(),
            executed_qty: "0".to_string(),
            price: "0".to_string(),
            avg_price: "0".to_string(),
            time_in_force: String::new(),
            update_time: 0,
        }
    }

    async fn run_script(session: MockExchangeSession, script: &str) -> String {
        let gateway = OrderGateway::new(session);
        let mut output = Vec::new();
        let mut shell = InteractiveShell::new(gateway, Cursor::new(script.to_string()), &mut output);
        shell.run().await.unwrap();
        drop(shell);
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_market_order_scenario_then_exit() {
        let mut session = MockExchangeSession::new();
        session
            .expect_create_order()
            .withf(|request| {
                request.symbol == "BTCUSDT"
                    && request.side == OrderSide::Buy
                    && request.order_type == OrderType::Market
                    && request.quantity == 0.01
                    && request.price.is_none()
                    && request.time_in_force.is_none()
            })
            .times(1)
            .returning(|request| Ok(sample_order(&request.symbol, "MARKET")));

        let output = run_script(session, "1\nBTCUSDT\nbuy\n0.01\n4\n").await;
        assert!(output.contains("Market Order Result:"));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_limit_order_scenario_then_exit() {
        let mut session = MockExchangeSession::new();
        session
            .expect_create_order()
            .withf(|request| {
                request.symbol == "ETHUSDT"
                    && request.side == OrderSide::Sell
                    && request.order_type == OrderType::Limit
                    && request.quantity == 1.0
                    && request.price == Some(3000.0)
                    && request.time_in_force == Some(TimeInForce::Gtc)
            })
            .times(1)
            .returning(|request| Ok(sample_order(&request.symbol, "LIMIT")));

        let output = run_script(session, "2\nETHUSDT\nSELL\n1\n3000\n4\n").await;
        assert!(output.contains("Limit Order Result:"));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_status_query_scenario() {
        let mut session = MockExchangeSession::new();
        session
            .expect_get_order()
            .withf(|symbol, order_id| symbol == "BTCUSDT" && *order_id == 283194212)
            .times(1)
            .returning(|symbol, _| Ok(sample_order(symbol, "MARKET")));

        let output = run_script(session, "3\nBTCUSDT\n283194212\n4\n").await;
        assert!(output.contains("Order Status:"));
    }

    #[tokio::test]
    async fn test_rejection_is_printed_and_loop_continues() {
        let mut session = MockExchangeSession::new();
        session.expect_create_order().times(1).returning(|_| {
            Err(ApiError::Rejected {
                code: -2019,
                message: "Insufficient margin".to_string(),
            })
        });

        let output = run_script(session, "1\nBTCUSDT\nBUY\n100\n4\n").await;
        assert!(output.contains("Failed to place market order: Insufficient margin"));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_bad_order_id_makes_no_remote_call() {
        // No expectations set: any session call would panic the mock.
        let session = MockExchangeSession::new();

        let output = run_script(session, "3\nBTCUSDT\nnot_a_number\n4\n").await;
        assert!(output.contains("An error occurred:"));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_bad_side_makes_no_remote_call() {
        let session = MockExchangeSession::new();

        let output = run_script(session, "1\nBTCUSDT\nhold\n4\n").await;
        assert!(output.contains("An error occurred:"));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_invalid_choice_reprompts() {
        let session = MockExchangeSession::new();

        let output = run_script(session, "9\n4\n").await;
        assert!(output.contains("Invalid choice. Please select 1-4."));
        assert!(output.contains("Exiting."));
    }

    #[tokio::test]
    async fn test_end_of_input_exits_cleanly() {
        let session = MockExchangeSession::new();

        let output = run_script(session, "").await;
        assert!(output.contains("Options:"));
    }
}
