//! Terraform manifest rendering
//!
//! Substitutes a [`DeploymentConfig`](crate::DeploymentConfig) into the
//! fixed Terraform template with Tera. Rendering is deterministic: the
//! same configuration always produces byte-identical output. Writing the
//! manifest to disk is the orchestrator's job, not this module's.

use crate::catalog::OptionCatalog;
use crate::config::DeploymentConfig;
use crate::error::{CoreError, Result};
use tera::{Context, Tera};

/// The fixed infrastructure manifest: one VPC with two public subnets,
/// security groups, one web server instance behind an application load
/// balancer, and output declarations for everything validation needs.
const TERRAFORM_TEMPLATE: &str = r#"provider "aws" {
  region = "{{ region }}"
}

# VPC Configuration
resource "aws_vpc" "main" {
  cidr_block           = "10.0.0.0/16"
  enable_dns_hostnames = true
  enable_dns_support   = true

  tags = {
    Name = "main-vpc"
  }
}

# Internet Gateway
resource "aws_internet_gateway" "main" {
  vpc_id = aws_vpc.main.id

  tags = {
    Name = "main-igw"
  }
}

# Public Subnets
resource "aws_subnet" "public" {
  count                   = 2
  vpc_id                  = aws_vpc.main.id
  cidr_block              = "10.0.${count.index + 1}.0/24"
  availability_zone       = element(["{{ availability_zone }}", "{{ secondary_availability_zone }}"], count.index)
  map_public_ip_on_launch = true

  tags = {
    Name = "public-subnet-${count.index + 1}"
  }
}

# Route Table for Public Subnets
resource "aws_route_table" "public" {
  vpc_id = aws_vpc.main.id

  route {
    cidr_block = "0.0.0.0/0"
    gateway_id = aws_internet_gateway.main.id
  }

  tags = {
    Name = "public-route-table"
  }
}

# Route Table Associations
resource "aws_route_table_association" "public" {
  count          = 2
  subnet_id      = aws_subnet.public[count.index].id
  route_table_id = aws_route_table.public.id
}

# Security Group for EC2 Instance
resource "aws_security_group" "instance_sg" {
  name        = "instance_security_group"
  description = "Security group for EC2 instance"
  vpc_id      = aws_vpc.main.id

  ingress {
    from_port       = 80
    to_port         = 80
    protocol        = "tcp"
    security_groups = [aws_security_group.lb_sg.id]
  }

  ingress {
    from_port   = 22
    to_port     = 22
    protocol    = "tcp"
    cidr_blocks = ["0.0.0.0/0"]
  }

  egress {
    from_port   = 0
    to_port     = 0
    protocol    = "-1"
    cidr_blocks = ["0.0.0.0/0"]
  }

  tags = {
    Name = "instance-sg"
  }
}

# Security Group for Load Balancer
resource "aws_security_group" "lb_sg" {
  name        = "lb_security_group"
  description = "Allow HTTP inbound traffic for ALB"
  vpc_id      = aws_vpc.main.id

  ingress {
    from_port   = 80
    to_port     = 80
    protocol    = "tcp"
    cidr_blocks = ["0.0.0.0/0"]
  }

  egress {
    from_port   = 0
    to_port     = 0
    protocol    = "-1"
    cidr_blocks = ["0.0.0.0/0"]
  }

  tags = {
    Name = "lb-sg"
  }
}

# EC2 Instance
resource "aws_instance" "web_server" {
  ami                    = "{{ ami }}"
  instance_type          = "{{ instance_type }}"
  subnet_id              = aws_subnet.public[0].id
  vpc_security_group_ids = [aws_security_group.instance_sg.id]

  user_data = <<-EOF
    #!/bin/bash
    yum update -y
    yum install -y httpd
    systemctl start httpd
    systemctl enable httpd
    echo "<h1>Hello from $(hostname -f)</h1>" > /var/www/html/index.html
  EOF

  tags = {
    Name = "WebServer"
  }
}

# Application Load Balancer
resource "aws_lb" "application_lb" {
  name               = "{{ load_balancer_name }}"
  internal           = false
  load_balancer_type = "application"
  security_groups    = [aws_security_group.lb_sg.id]
  subnets            = aws_subnet.public[*].id

  enable_deletion_protection = false

  tags = {
    Name = "{{ load_balancer_name }}"
  }
}

# Target Group
resource "aws_lb_target_group" "web_target_group" {
  name     = "web-target-group"
  port     = 80
  protocol = "HTTP"
  vpc_id   = aws_vpc.main.id

  health_check {
    enabled             = true
    healthy_threshold   = 2
    unhealthy_threshold = 2
    timeout             = 5
    interval            = 30
    path                = "/"
    matcher             = "200"
  }

  tags = {
    Name = "web-target-group"
  }
}

# Target Group Attachment
resource "aws_lb_target_group_attachment" "web_instance_attachment" {
  target_group_arn = aws_lb_target_group.web_target_group.arn
  target_id        = aws_instance.web_server.id
  port             = 80
}

# Load Balancer Listener
resource "aws_lb_listener" "http_listener" {
  load_balancer_arn = aws_lb.application_lb.arn
  port              = "80"
  protocol          = "HTTP"

  default_action {
    type             = "forward"
    target_group_arn = aws_lb_target_group.web_target_group.arn
  }
}

# Outputs
output "instance_id" {
  description = "ID of the EC2 instance"
  value       = aws_instance.web_server.id
}

output "instance_public_ip" {
  description = "Public IP address of the EC2 instance"
  value       = aws_instance.web_server.public_ip
}

output "load_balancer_dns" {
  description = "DNS name of the load balancer"
  value       = aws_lb.application_lb.dns_name
}

output "load_balancer_arn" {
  description = "ARN of the load balancer"
  value       = aws_lb.application_lb.arn
}

output "vpc_id" {
  description = "ID of the VPC"
  value       = aws_vpc.main.id
}
"#;

/// Render the Terraform manifest for a fully-populated configuration.
///
/// The catalog supplies the secondary availability zone (the load balancer
/// spans two zones). A render failure here means a broken template, not
/// bad operator input: the configuration is validated before this call.
pub fn render_manifest(config: &DeploymentConfig, catalog: &OptionCatalog) -> Result<String> {
    let mut context = Context::new();
    context.insert("region", &config.region);
    context.insert("ami", &config.ami_id);
    context.insert("instance_type", &config.instance_type);
    context.insert("load_balancer_name", &config.load_balancer_name);
    context.insert("availability_zone", &config.availability_zone);
    context.insert(
        "secondary_availability_zone",
        catalog.secondary_zone(&config.availability_zone),
    );

    let mut tera = Tera::default();
    tera.render_str(TERRAFORM_TEMPLATE, &context)
        .map_err(|e| CoreError::TemplateRender(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config() -> DeploymentConfig {
        DeploymentConfig {
            ami_id: "ami-0b898040803850657".to_string(),
            instance_type: "t3.small".to_string(),
            region: "us-east-1".to_string(),
            availability_zone: "us-east-1a".to_string(),
            load_balancer_name: "demo-alb".to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let catalog = OptionCatalog::default();
        let manifest = render_manifest(&demo_config(), &catalog).unwrap();

        assert!(manifest.contains("ami-0b898040803850657"));
        assert!(manifest.contains("\"demo-alb\""));
        assert!(manifest.contains("instance_type          = \"t3.small\""));
        assert!(manifest.contains("region = \"us-east-1\""));
        assert!(manifest.contains("element([\"us-east-1a\", \"us-east-1b\"], count.index)"));
        assert!(!manifest.contains("{{"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let catalog = OptionCatalog::default();
        let config = demo_config();

        let first = render_manifest(&config, &catalog).unwrap();
        let second = render_manifest(&config, &catalog).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_secondary_zone_follows_primary_choice() {
        let catalog = OptionCatalog::default();
        let mut config = demo_config();
        config.availability_zone = "us-east-1b".to_string();

        let manifest = render_manifest(&config, &catalog).unwrap();
        assert!(manifest.contains("element([\"us-east-1b\", \"us-east-1a\"], count.index)"));
    }

    #[test]
    fn test_terraform_interpolation_left_untouched() {
        let catalog = OptionCatalog::default();
        let manifest = render_manifest(&demo_config(), &catalog).unwrap();

        // ${...} is Terraform syntax, not a template placeholder
        assert!(manifest.contains("${count.index + 1}"));
        assert!(manifest.contains("output \"instance_id\""));
        assert!(manifest.contains("output \"load_balancer_dns\""));
    }
}
